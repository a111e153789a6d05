use clap::Parser;
use xshell::cmd;

const SITE_DIR: &str = "shikkha-site";

#[derive(Debug, clap::Args)]
struct BuildArgs {
    #[arg(long, short)]
    release: bool,

    /// Base URL of the REST backend baked into the site
    #[arg(long, env = "SHIKKHA_API_BASE")]
    api_base: Option<String>,
}

#[derive(Debug, clap::Args)]
struct ServeArgs {
    #[command(flatten)]
    build_args: BuildArgs,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[derive(Debug, clap::Subcommand)]
enum Command {
    /// Package the site with trunk
    Build(BuildArgs),
    /// Serve the site with trunk, rebuilding on changes
    Serve(ServeArgs),
    /// Run the tests of the crates that do not need a browser
    Test,
}

#[derive(Debug, clap::Parser)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

fn site_shell(args: &BuildArgs) -> anyhow::Result<xshell::Shell> {
    let shell = xshell::Shell::new()?;
    shell.change_dir(SITE_DIR);
    if let Some(api_base) = &args.api_base {
        shell.set_var("SHIKKHA_API_BASE", api_base);
    }
    Ok(shell)
}

fn build(args: &BuildArgs) -> anyhow::Result<()> {
    let release = args.release.then_some("--release");
    let shell = site_shell(args)?;
    cmd!(shell, "trunk build {release...}").run()?;
    Ok(())
}

fn serve(args: &ServeArgs) -> anyhow::Result<()> {
    let release = args.build_args.release.then_some("--release");
    let port = args.port.to_string();
    let shell = site_shell(&args.build_args)?;
    cmd!(shell, "trunk serve {release...} --port {port}").run()?;
    Ok(())
}

fn test() -> anyhow::Result<()> {
    let shell = xshell::Shell::new()?;
    cmd!(shell, "cargo test -p shikkha-api -p shikkha-client").run()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    match &args.command {
        Command::Build(args) => build(args)?,
        Command::Serve(args) => serve(args)?,
        Command::Test => test()?,
    }

    Ok(())
}
