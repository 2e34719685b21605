use clap::{Parser, Subcommand};
use std::process::ExitCode;
use wit::areas::repository::Repository;
use wit::commands::merge::MergeOutcome;

#[derive(Parser)]
#[command(
    name = "wit",
    version = "0.1.0",
    about = "A minimal local version control system",
    long_about = "wit is a small content-addressed version control system. \
    It stores every snapshot as immutable objects, keyed by the hash of their \
    content, and supports branching, checkout, and three-way merges.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
",
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command initializes a new repository in the current directory or at the specified path."
    )]
    Init {
        #[arg(index = 1, help = "The path to the repository")]
        path: Option<String>,
    },
    #[command(
        name = "add",
        about = "Stage files for the next commit",
        long_about = "This command hashes the given files into the object store and records them \
        in the staging area. Directories are staged recursively."
    )]
    Add {
        #[arg(index = 1, required = true, help = "The files or directories to stage")]
        paths: Vec<String>,
    },
    #[command(
        name = "remove",
        about = "Unstage a file or directory",
        long_about = "This command removes the given path from the staging area. \
        The working tree is left untouched."
    )]
    Remove {
        #[arg(index = 1, help = "The path to unstage")]
        path: String,
    },
    #[command(
        name = "commit",
        about = "Record the staged snapshot as a new commit",
        long_about = "This command creates a new commit from the staging area and advances \
        the current branch to it."
    )]
    Commit {
        #[arg(short, long, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "branch",
        about = "Create a branch, or list branches",
        long_about = "With a name, this command creates a new branch pointing at the current \
        commit. Without one, it lists all branches."
    )]
    Branch {
        #[arg(index = 1, help = "The name of the branch to create")]
        name: Option<String>,
    },
    #[command(
        name = "checkout",
        about = "Switch to a branch or commit",
        long_about = "This command replaces the working tree and staging area with the snapshot \
        of the given branch or commit. Checking out a commit id detaches HEAD."
    )]
    Checkout {
        #[arg(index = 1, help = "The branch name or commit id to switch to")]
        target: String,
        #[arg(short, long, help = "Discard local changes that would be overwritten")]
        force: bool,
    },
    #[command(
        name = "merge",
        about = "Merge another branch or commit into the current one",
        long_about = "This command combines the given branch or commit with the current HEAD. \
        Conflicting files are written with conflict markers and the merge stops \
        without committing."
    )]
    Merge {
        #[arg(index = 1, help = "The branch name or commit id to merge")]
        target: String,
        #[arg(short, long, help = "The merge commit message")]
        message: Option<String>,
    },
    #[command(
        name = "status",
        about = "Show the working tree status",
        long_about = "This command shows the current branch, staged changes, unstaged changes, \
        and untracked files."
    )]
    Status,
    #[command(
        name = "graph",
        about = "Render the commit graph as Graphviz DOT",
        long_about = "This command prints the commit history reachable from HEAD (or from all \
        branches) in Graphviz DOT format."
    )]
    Graph {
        #[arg(short, long, help = "Include commits reachable from any branch")]
        all: bool,
    },
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let repository = match &cli.command {
        Commands::Init { path: Some(path) } => Repository::new(path, Box::new(std::io::stdout()))?,
        _ => {
            let pwd = std::env::current_dir()?;
            Repository::new(&pwd.to_string_lossy(), Box::new(std::io::stdout()))?
        }
    };

    match &cli.command {
        Commands::Init { .. } => repository.init()?,
        Commands::Add { paths } => repository.add(paths)?,
        Commands::Remove { path } => repository.remove(path)?,
        Commands::Commit { message } => repository.commit(message)?,
        Commands::Branch { name } => repository.branch(name.as_deref())?,
        Commands::Checkout { target, force } => repository.checkout(target, *force)?,
        Commands::Merge { target, message } => {
            if let MergeOutcome::Conflicted(_) = repository.merge(target, message.as_deref())? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Status => repository.status()?,
        Commands::Graph { all } => repository.graph(*all)?,
    }

    Ok(ExitCode::SUCCESS)
}
