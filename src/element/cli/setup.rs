use clap::{ArgAction, Parser, Subcommand};

/// Version string, with the commit hash for builds from a checkout.
const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), env!("ELEMENT_BUILD_INFO"));

#[derive(Parser, Debug)]
#[command(
    name = "element",
    bin_name = "element",
    version = VERSION,
    disable_version_flag = true,
    arg_required_else_help = true
)]
#[command(about = "Command line interface for the Volusion Element ecosystem", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Display verbose output (request URLs and response bodies)
    #[arg(short = 'V', long, global = true)]
    pub verbose: bool,

    /// Upload the existing build output without running the build
    #[arg(short = 'S', long, global = true)]
    pub skip_build: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    pub version: Option<bool>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in using your Volusion credentials
    Login {
        #[arg(short, long)]
        username: Option<String>,

        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored credentials
    Logout,

    /// Create the block boilerplate
    New { name: String },

    /// List the category names blocks can be published under
    Categories,

    /// Show what the registry holds for this block
    Info {
        /// Major version to show, instead of the active one
        #[arg(short, long = "major-version", value_name = "N")]
        major_version: Option<u32>,
    },

    /// Publish a block to the Block Theme Registry.
    ///
    /// Keep your thumbnail under 1000 kb and aim for more of a rectangle than a square.
    Publish {
        /// Name for publishing (defaults to the name given to `new`)
        #[arg(short, long)]
        name: Option<String>,

        /// The category name that best fits this block
        #[arg(short, long)]
        category: Option<String>,

        /// Target integration (element, v1)
        #[arg(short, long)]
        integration: Option<String>,

        /// Publish a new major version of this block
        #[arg(short, long)]
        major_version: bool,

        /// Don't ask for confirmation
        #[arg(short, long)]
        silent: bool,

        /// Seconds the registry should cache rendered output (0 disables)
        #[arg(long, value_name = "SECONDS")]
        cache_duration: Option<String>,
    },

    /// Update your existing block in the Block Theme Registry
    Update {
        /// Toggle whether the block is viewable outside your organization
        #[arg(short = 'p', long)]
        toggle_public: bool,

        /// Send the unminified bundle; useful for debugging
        #[arg(short, long)]
        unminified: bool,

        /// Move the block to another category
        #[arg(short, long)]
        category: Option<String>,

        /// Target integration (element, v1)
        #[arg(short, long)]
        integration: Option<String>,

        /// Seconds the registry should cache rendered output (0 disables)
        #[arg(long, value_name = "SECONDS")]
        cache_duration: Option<String>,
    },

    /// Release your block and push it live.
    ///
    /// Other organizations can't use the block until you `update --toggle-public`.
    Release {
        /// Note attached to the release
        #[arg(short, long)]
        note: Option<String>,

        /// Don't ask for confirmation
        #[arg(short, long)]
        silent: bool,
    },

    /// Roll back the latest change to this block.
    ///
    /// A released version goes back to staging and the previous release is used in
    /// production. A staged version is removed.
    Rollback {
        /// Don't ask for confirmation
        #[arg(short, long)]
        silent: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("element").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_publish_flags() {
        let cli = parse(&["publish", "-n", "Hero", "-c", "Layout", "-i", "v1", "--cache-duration", "60"]);
        match cli.command {
            Commands::Publish {
                name,
                category,
                integration,
                major_version,
                silent,
                cache_duration,
            } => {
                assert_eq!(name.as_deref(), Some("Hero"));
                assert_eq!(category.as_deref(), Some("Layout"));
                assert_eq!(integration.as_deref(), Some("v1"));
                assert!(!major_version);
                assert!(!silent);
                assert_eq!(cache_duration.as_deref(), Some("60"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = parse(&["update", "-p", "-u", "-V", "-S"]);
        assert!(cli.verbose);
        assert!(cli.skip_build);
        assert!(matches!(
            cli.command,
            Commands::Update {
                toggle_public: true,
                unminified: true,
                ..
            }
        ));
    }

    #[test]
    fn test_major_version_silent() {
        let cli = parse(&["publish", "-m", "-s"]);
        assert!(matches!(
            cli.command,
            Commands::Publish {
                major_version: true,
                silent: true,
                ..
            }
        ));
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["element", "-v"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_new_requires_name() {
        assert!(Cli::try_parse_from(["element", "new"]).is_err());
    }
}
