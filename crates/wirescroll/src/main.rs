mod cli;
mod paths;
mod run;

use std::path::Path;

use anyhow::{Context, Result};
use cli::{Command, ConfigAction, RunArgs};
use paths::AppPaths;

fn main() -> Result<()> {
    let cli = cli::parse();
    run::initialise_tracing();

    match cli.command {
        Some(Command::Config(config_cmd)) => handle_config_command(config_cmd.action, &cli.run),
        None => run::run(cli.run),
    }
}

fn handle_config_command(action: ConfigAction, args: &RunArgs) -> Result<()> {
    match action {
        ConfigAction::Show { json } => run_config_show(args, json),
        ConfigAction::Check { file } => run_config_check(&file),
        ConfigAction::Where => run_config_where(),
    }
}

fn run_config_show(args: &RunArgs, json: bool) -> Result<()> {
    let paths = AppPaths::discover()?;
    let scene = run::load_scene(args, &paths)?;
    let resolved = scene.config.resolved()?;

    if json {
        let rendered =
            serde_json::to_string_pretty(&resolved).context("failed to render config as JSON")?;
        println!("{rendered}");
    } else {
        match &scene.source {
            Some(path) => println!("# source: {}", path.display()),
            None => println!("# source: built-in defaults"),
        }
        print!("{}", resolved.to_toml_string()?);
    }
    Ok(())
}

fn run_config_check(file: &Path) -> Result<()> {
    let config = run::read_scene_file(file)?;
    let settings = config.settings()?;
    let animated = settings
        .iter()
        .filter(|(_, setting)| !setting.is_static())
        .count();
    println!(
        "{}: ok ({} sections, {} scroll-driven uniforms)",
        file.display(),
        config.sections.len(),
        animated
    );
    Ok(())
}

fn run_config_where() -> Result<()> {
    let paths = AppPaths::discover()?;
    let scene_file = paths.scene_file();
    println!("Configuration:");
    println!(
        "  config dir: {}{}",
        paths.config_dir().display(),
        if paths.is_overridden() {
            " (from WIRESCROLL_CONFIG_DIR)"
        } else {
            ""
        }
    );
    println!(
        "  scene file: {} ({})",
        scene_file.display(),
        if scene_file.is_file() {
            "present"
        } else {
            "missing"
        }
    );
    Ok(())
}
