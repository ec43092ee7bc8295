use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use tftmenu::{
    config,
    menu::{Menu, MenuResult},
    platform,
};

#[derive(Parser, Debug)]
#[command(
    name = "tft-menu",
    version,
    about = "Full-screen touch button menu; prints the chosen command"
)]
struct Cli {
    /// Menu description (JSON).
    input: PathBuf,

    /// More logging on stderr (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Framebuffer device to draw on.
    #[arg(long, env = "TFT_MENU_FBDEV", default_value = "/dev/fb1")]
    fbdev: PathBuf,

    /// Touchscreen event device.
    #[arg(long, env = "TFT_MENU_TOUCH", default_value = "/dev/input/touchscreen")]
    touch: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let cfg = config::load(&cli.input)
        .with_context(|| format!("load menu {}", cli.input.display()))?;

    let surface = platform::open_surface(&cli.fbdev).context("open display")?;
    let input = platform::open_input(&cli.touch, cfg.touch.clone(), surface.size())
        .context("open touch input")?;
    #[cfg(target_os = "linux")]
    platform::signals::install_quit_handlers().context("install signal handlers")?;

    let mut menu = Menu::new(&cfg, surface, input).context("lay out buttons")?;
    match menu.run()? {
        MenuResult::Activated(cmd) => println!("{cmd}"),
        MenuResult::Quit => {}
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // stdout is reserved for the selected command.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}
