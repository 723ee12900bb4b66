use anyhow::Result;
use clap::{Parser, Subcommand};

use git_semv::config::{self, Config};
use git_semv::current;
use git_semv::domain::{Channel, Scope, TagSet, Version};
use git_semv::git::{Git2Repository, Repository};
use git_semv::resolver::{self, Resolution, ResolveRequest};
use git_semv::tagger::Tagger;
use git_semv::ui;

#[derive(Parser)]
#[command(
    name = "git-semv",
    about = "Resolve and create semantic version tags from git history"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, global = true, help = "Plain output without the tag prefix")]
    plain: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current final version
    Getfinal,
    /// Print the last version, pre-release included
    Getlast,
    /// Print the working-tree version string
    Getcurrent,
    /// Print the next version without tagging
    Get {
        /// Release channel: final, alpha, beta or candidate
        #[arg(default_value = "final")]
        channel: String,

        #[command(flatten)]
        args: ReleaseArgs,
    },
    /// Tag the next final version
    Final(ReleaseArgs),
    /// Tag the next alpha pre-release
    Alpha(ReleaseArgs),
    /// Tag the next beta pre-release
    Beta(ReleaseArgs),
    /// Tag the next release candidate
    Candidate(ReleaseArgs),
}

#[derive(clap::Args)]
struct ReleaseArgs {
    #[arg(
        short,
        long,
        default_value = "minor",
        help = "Bump scope: major, minor, patch or auto"
    )]
    scope: String,

    #[arg(short = 'v', long, help = "Explicit target version")]
    version: Option<String>,

    #[arg(short, long, help = "Only print the version, do not tag or push")]
    output_only: bool,

    #[arg(short, long, help = "Bypass the dirty-tree and no-new-commit guards")]
    force: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load_config(cli.config.as_deref())?;
    let output_prefix = if cli.plain {
        String::new()
    } else {
        config.tags.prefix.clone()
    };

    let repo = Git2Repository::open(".")?;
    let tags = TagSet::from_tags(repo.list_tags()?, &config.tags.prefix);

    match cli.command {
        Command::Getfinal => {
            let version = tags
                .final_max()
                .map(|t| t.version.clone())
                .unwrap_or_else(Version::zero);
            println!("{}", version.format(&output_prefix));
        }
        Command::Getlast => {
            let version = tags
                .last()
                .map(|t| t.version.clone())
                .unwrap_or_else(Version::zero);
            println!("{}", version.format(&output_prefix));
        }
        Command::Getcurrent => {
            println!("{}", current::format_current(&tags, &repo, &output_prefix)?);
        }
        Command::Get { channel, args } => {
            let request = build_request(&args, channel.parse()?, &config)?;
            let resolution =
                resolver::resolve(&tags, &request, &repo, config.auto.minor_threshold_pct)?;
            println!("{}", resolution.version().format(&output_prefix));
        }
        Command::Final(args) => release(Channel::Final, args, &config, &tags, &repo, &output_prefix)?,
        Command::Alpha(args) => release(Channel::Alpha, args, &config, &tags, &repo, &output_prefix)?,
        Command::Beta(args) => release(Channel::Beta, args, &config, &tags, &repo, &output_prefix)?,
        Command::Candidate(args) => {
            release(Channel::Rc, args, &config, &tags, &repo, &output_prefix)?
        }
    }

    Ok(())
}

fn build_request(args: &ReleaseArgs, channel: Channel, config: &Config) -> Result<ResolveRequest> {
    let scope: Scope = args.scope.parse()?;

    let mut request = ResolveRequest::new(channel, scope);
    if let Some(text) = &args.version {
        request = request.with_explicit(Version::parse(text, &config.tags.prefix)?);
    }
    if args.force {
        request = request.forced();
    }

    Ok(request)
}

fn release<R: Repository + ?Sized>(
    channel: Channel,
    args: ReleaseArgs,
    config: &Config,
    tags: &TagSet,
    repo: &R,
    output_prefix: &str,
) -> Result<()> {
    let request = build_request(&args, channel, config)?;

    match resolver::resolve(tags, &request, repo, config.auto.minor_threshold_pct)? {
        Resolution::UpToDate(version) => {
            ui::display_status(&format!(
                "No new commits since {}; nothing to tag",
                version.format(output_prefix)
            ));
            println!("{}", version.format(output_prefix));
        }
        Resolution::Release(version) => {
            if args.output_only {
                println!("{}", version.format(output_prefix));
                return Ok(());
            }

            let previous = tags.last().map(|t| t.tag.clone());
            let subjects = repo.commit_subjects_since(previous.as_deref())?;

            let tagger = Tagger::new(repo, config.remote.name.as_str());
            let outcome = tagger.tag(&version, &config.tags.prefix, &subjects, config.remote.push)?;

            ui::display_success(&format!("Created tag {}", outcome.tag));

            if let Some(err) = outcome.push_error {
                // The local tag is kept; pushing is left to the caller
                ui::display_warning(&format!(
                    "Tag {} was created locally but the push failed",
                    outcome.tag
                ));
                ui::display_status(&format!(
                    "To push it later, run: git push {} {}",
                    config.remote.name, outcome.tag
                ));
                return Err(anyhow::anyhow!(err));
            }

            if outcome.pushed {
                ui::display_success(&format!(
                    "Pushed tag {} to {}",
                    outcome.tag, config.remote.name
                ));
            }

            println!("{}", version.format(output_prefix));
        }
    }

    Ok(())
}
