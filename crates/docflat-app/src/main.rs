// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Docflat — find the corners of a photographed document, let them be edited,
// and flatten the page.

mod services;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use docflat_core::error::Result;
use docflat_core::human_errors::humanize_error;
use docflat_core::{AppConfig, Normalized, PlanId, Point2D, Quadrilateral};
use docflat_editor::{DocumentSession, GesturePhase};
use image::DynamicImage;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use services::app_services::AppServices;
use services::data_dir;

/// Exit status when no document was found.
const EXIT_NOT_FOUND: u8 = 2;

#[derive(Debug, Parser)]
#[command(author, version, about = "Detect, edit and flatten photographed documents")]
struct Args {
    /// Config file (JSON). Defaults to $XDG_CONFIG_HOME/docflat/config.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Plan order to use instead of the configured one, e.g. `ml,native`.
    #[arg(long, global = true, value_delimiter = ',')]
    plans: Option<Vec<PlanId>>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the normalized document corners as JSON.
    Detect {
        image: PathBuf,
    },
    /// Flatten the document and write it to `--output`.
    Correct {
        image: PathBuf,
        #[arg(long, short)]
        output: PathBuf,
        /// Normalized corners (JSON) to use instead of detecting.
        #[arg(long)]
        corners: Option<PathBuf>,
    },
    /// Replay a corner drag and print the resulting normalized corners.
    Edit {
        image: PathBuf,
        /// Normalized corners (JSON) to start from instead of detecting.
        #[arg(long)]
        corners: Option<PathBuf>,
        /// Pointer positions in pixels (`x,y`): press, moves, release.
        #[arg(long = "drag", value_parser = parse_point, num_args = 1.., required = true)]
        drag: Vec<Point2D>,
    },
    /// Print the effective configuration.
    Config {
        /// Also write it to the config file.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match try_main(Args::parse()).await {
        Ok(code) => code,
        Err(err) => {
            let human = humanize_error(&err);
            tracing::debug!(error = %err, retriable = human.retriable, "command failed");
            eprintln!("error: {}", human.message);
            eprintln!("  {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

async fn try_main(args: Args) -> Result<ExitCode> {
    let config_path = args.config.clone().unwrap_or_else(data_dir::default_config_path);
    let config = load_config(&config_path, args.plans)?;

    if let Command::Config { write } = args.command {
        println!("{}", serde_json::to_string_pretty(&config)?);
        if write {
            config.save(&config_path)?;
            info!(path = %config_path.display(), "config written");
        }
        return Ok(ExitCode::SUCCESS);
    }

    info!("docflat starting");
    let services = AppServices::init(config);

    match args.command {
        Command::Detect { image } => {
            let image = Arc::new(AppServices::load_image(&image)?);
            match services.detect(image).await.into_result()? {
                Some(quad) => {
                    println!("{}", serde_json::to_string_pretty(&quad)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("no document found");
                    Ok(ExitCode::from(EXIT_NOT_FOUND))
                }
            }
        }
        Command::Correct {
            image,
            output,
            corners,
        } => {
            let image = Arc::new(AppServices::load_image(&image)?);
            let start = starting_corners(&services, &image, corners.as_deref()).await?;
            if start.is_none() {
                warn!("no document found; flattening the whole frame");
            }
            let quad = services.session(&image, start).corners_for_correction()?;
            match services.correct(image, quad).await.into_result()? {
                Some(flat) => {
                    AppServices::save_image(&flat, &output)?;
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("no plan produced an image");
                    Ok(ExitCode::from(EXIT_NOT_FOUND))
                }
            }
        }
        Command::Edit {
            image,
            corners,
            drag,
        } => {
            let image = Arc::new(AppServices::load_image(&image)?);
            let start = starting_corners(&services, &image, corners.as_deref()).await?;
            let mut session = services.session(&image, start);
            if !replay_drag(&mut session, &drag) {
                warn!(press = %drag[0], "press is not near a corner; nothing moved");
            }
            println!("{}", serde_json::to_string_pretty(&session.normalized())?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Config { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn load_config(path: &Path, plans: Option<Vec<PlanId>>) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(path)?;
    if let Some(plans) = plans {
        config.plans = plans;
    }
    config.validate()?;
    Ok(config)
}

/// Corners from `--corners`, otherwise whatever detection finds.
async fn starting_corners(
    services: &AppServices,
    image: &Arc<DynamicImage>,
    corners: Option<&Path>,
) -> Result<Option<Quadrilateral<Normalized>>> {
    match corners {
        Some(path) => load_json_file(path).map(Some),
        None => services.detect(Arc::clone(image)).await.into_result(),
    }
}

/// Press at the first point, move through the rest, release at the last.
/// Returns whether the press grabbed a corner.
fn replay_drag(session: &mut DocumentSession, points: &[Point2D]) -> bool {
    let Some((&press, moves)) = points.split_first() else {
        return false;
    };
    if !session.handle(GesturePhase::Press, press) {
        return false;
    }
    for &point in moves {
        session.handle(GesturePhase::Move, point);
    }
    let release = moves.last().copied().unwrap_or(press);
    session.handle(GesturePhase::Release, release);
    true
}

fn load_json_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn parse_point(s: &str) -> std::result::Result<Point2D, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|err| format!("bad coordinate `{v}`: {err}"))
    };
    Ok(Point2D::new(parse(x)?, parse(y)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn parses_points() {
        assert_eq!(parse_point("12.5, 40").unwrap(), Point2D::new(12.5, 40.0));
        assert!(parse_point("12.5").is_err());
        assert!(parse_point("a,1").is_err());
    }

    #[test]
    fn parses_plan_override_and_drag() {
        let args = Args::try_parse_from([
            "docflat", "--plans", "vendor,native", "edit", "photo.jpg", "--drag", "0,0", "--drag",
            "10,10",
        ])
        .unwrap();
        assert_eq!(args.plans, Some(vec![PlanId::Vendor, PlanId::Native]));
        match args.command {
            Command::Edit { drag, .. } => {
                assert_eq!(drag, vec![Point2D::new(0.0, 0.0), Point2D::new(10.0, 10.0)]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn unknown_plan_is_rejected() {
        assert!(Args::try_parse_from(["docflat", "--plans", "magic", "detect", "a.png"]).is_err());
    }

    #[test]
    fn plan_override_replaces_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "plans": ["ml"], "pick_radius": 12.0 }}"#).unwrap();

        let config = load_config(file.path(), Some(vec![PlanId::Native])).unwrap();
        assert_eq!(config.plans, vec![PlanId::Native]);
        assert_eq!(config.pick_radius, 12.0);
    }

    #[test]
    fn invalid_config_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pick_radius": -1.0 }}"#).unwrap();
        assert!(load_config(file.path(), None).is_err());
    }

    #[test]
    fn loads_corner_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "top_left": {{ "x": 0.1, "y": 0.1 }},
                "top_right": {{ "x": 0.9, "y": 0.1 }},
                "bottom_left": {{ "x": 0.1, "y": 0.9 }},
                "bottom_right": {{ "x": 0.9, "y": 0.9 }}
            }}"#
        )
        .unwrap();

        let quad: Quadrilateral<Normalized> = load_json_file(file.path()).unwrap();
        assert_eq!(quad[docflat_core::CornerLabel::BottomRight], Point2D::new(0.9, 0.9));
    }

    #[test]
    fn replayed_drag_moves_grabbed_corner() {
        let mut session = DocumentSession::new(100, 100, 24.0);
        let moved = replay_drag(
            &mut session,
            &[Point2D::new(2.0, 2.0), Point2D::new(10.0, 5.0), Point2D::new(20.0, 10.0)],
        );
        assert!(moved);
        // Grab offset (2, 2) is kept through the drag.
        assert_eq!(
            session.quad()[docflat_core::CornerLabel::TopLeft],
            Point2D::new(18.0, 8.0)
        );
    }

    #[test]
    fn press_away_from_corners_moves_nothing() {
        let mut session = DocumentSession::new(100, 100, 24.0);
        let before = session.quad();
        assert!(!replay_drag(&mut session, &[Point2D::new(50.0, 50.0), Point2D::new(60.0, 60.0)]));
        assert_eq!(session.quad(), before);
    }
}
