//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use sitedata_core::{ResourceKind, Sheet};

/// Inspect the site's content sheets and media files.
///
/// Reads its configuration from SHEETS_API_URL, SHEETS_API_TOKEN,
/// MEDIA_CLOUD_NAME, MEDIA_API_KEY, and MEDIA_API_SECRET.
#[derive(Parser, Debug)]
#[command(name = "sitedata")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print every record in a collection as JSON
    List {
        collection: CollectionArg,
        /// Fail instead of printing an empty list when the backend errors
        #[arg(long)]
        strict: bool,
    },
    /// Print one record as JSON (`null` when absent)
    Get { collection: CollectionArg, id: String },
    /// Provision one collection, or all of them
    Setup { collection: Option<CollectionArg> },
    /// Download a stored media file through the signing proxy
    Download {
        url: String,
        /// Display name used for the saved filename
        #[arg(short, long, default_value = "download")]
        name: String,
        /// Directory to save into
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Print a signed browser-upload payload as JSON
    SignUpload {
        #[arg(short, long)]
        folder: String,
        #[arg(short, long, value_enum, default_value_t = KindArg::Image)]
        kind: KindArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionArg {
    Blog,
    Events,
    Brochures,
    Subscribers,
    Popups,
    Applications,
    CourseOfferings,
}

impl From<CollectionArg> for Sheet {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Blog => Sheet::Blog,
            CollectionArg::Events => Sheet::Events,
            CollectionArg::Brochures => Sheet::Brochures,
            CollectionArg::Subscribers => Sheet::Subscribers,
            CollectionArg::Popups => Sheet::Popups,
            CollectionArg::Applications => Sheet::Applications,
            CollectionArg::CourseOfferings => Sheet::CourseOfferings,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum KindArg {
    Image,
    Video,
    Raw,
}

impl From<KindArg> for ResourceKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Image => ResourceKind::Image,
            KindArg::Video => ResourceKind::Video,
            KindArg::Raw => ResourceKind::Raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_list_parses_collection() {
        let args = Args::try_parse_from(["sitedata", "list", "course-offerings"]).unwrap();
        match args.command {
            Command::List { collection, strict } => {
                assert_eq!(Sheet::from(collection), Sheet::CourseOfferings);
                assert!(!strict);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_verbose_flag_is_global() {
        let args = Args::try_parse_from(["sitedata", "get", "blog", "abc", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_unknown_collection() {
        let result = Args::try_parse_from(["sitedata", "list", "orders"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_sign_upload_defaults_to_image() {
        let args = Args::try_parse_from(["sitedata", "sign-upload", "--folder", "gallery"]).unwrap();
        match args.command {
            Command::SignUpload { folder, kind } => {
                assert_eq!(folder, "gallery");
                assert_eq!(kind, KindArg::Image);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["sitedata", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
