//! sphio-runner: headless driver exercising recording, restart, and reload.
//!
//! Usage:
//!   sphio-runner --root run --seed 7 --steps 200 --dt 0.001
//!   sphio-runner --root run --resume-latest --steps 100
//!   sphio-runner --root run --resume 100
//!   sphio-runner --root run --relax 20 --write-reload       # generate a layout
//!   sphio-runner --root other --reload-from run/reload --steps 50
//!   sphio-runner --root run --schedule schedule.json       # {"restart_interval": 50}

use anyhow::{Context, Result};
use sphio_core::{
    clock::SimClock,
    driver::{SimDriver, Stepper},
    particles::ParticleBlock,
    rng::LayoutRng,
    CheckpointSchedule, IoEnvironment, ReloadParticleIo,
};
use std::env;
use std::path::PathBuf;

const BODY_NAMES: [&str; 2] = ["Water", "Block"];

/// Free fall under constant gravity. Stands in for the real physics.
struct FreeFall {
    gravity: f64,
}

impl Stepper<ParticleBlock> for FreeFall {
    fn name(&self) -> &'static str {
        "free_fall"
    }

    fn step(&mut self, bodies: &mut [ParticleBlock], _clock: &SimClock, dt: f64) -> Result<()> {
        for body in bodies.iter_mut() {
            for p in &mut body.particles {
                p.velocity[2] -= self.gravity * dt;
            }
            body.drift(dt);
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let steps = parse_arg(&args, "--steps", 200u64);
    let dt = parse_arg(&args, "--dt", 1.0e-3f64);
    let count = parse_arg(&args, "--particles", 64usize);
    let relax_sweeps = parse_arg(&args, "--relax", 0usize);
    let record_every = parse_arg(&args, "--record-every", 10u64);
    let restart_every = parse_arg(&args, "--restart-every", 100u64);
    let resume_step: Option<u64> = find_arg(&args, "--resume").and_then(|s| s.parse().ok());
    let resume_latest = args.iter().any(|a| a == "--resume-latest");
    let write_reload = args.iter().any(|a| a == "--write-reload");
    let reload_from = find_arg(&args, "--reload-from").map(PathBuf::from);
    let root = find_arg(&args, "--root").unwrap_or("./sphio_run");

    let env_cfg = match find_arg(&args, "--config") {
        Some(path) => IoEnvironment::load(path)?,
        None => IoEnvironment::prepare(root)?,
    };

    println!("sphio-runner");
    println!("  seed:      {seed}");
    println!("  steps:     {steps}");
    println!("  dt:        {dt}");
    println!("  output:    {}", env_cfg.state_recording_folder.display());
    println!("  restart:   {}", env_cfg.restart_folder.display());
    println!("  reload:    {}", env_cfg.reload_folder.display());
    println!();

    let bodies: Vec<ParticleBlock> = BODY_NAMES
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let mut rng = LayoutRng::new(seed, i as u64);
            let mut block = ParticleBlock::random(*name, count, 1.0, &mut rng);
            if relax_sweeps > 0 {
                block.relax(0.5 / (count as f64).cbrt(), relax_sweeps);
            }
            block
        })
        .collect();

    let schedule = match find_arg(&args, "--schedule") {
        Some(path) => CheckpointSchedule::load(path)?,
        None => CheckpointSchedule {
            recording_interval: record_every,
            restart_interval: restart_every,
        },
    };
    let mut driver = SimDriver::new(
        env_cfg.clone(),
        schedule,
        bodies,
        Box::new(FreeFall { gravity: 9.81 }),
    )?;

    if let Some(folder) = reload_from {
        let source_env = IoEnvironment {
            reload_folder: folder,
            ..env_cfg.clone()
        };
        let reload = ReloadParticleIo::new(source_env, &views(driver.bodies()));
        driver
            .apply_reload(&reload)
            .context("cannot seed bodies from reload files")?;
        println!("Seeded bodies from reload files.");
    }

    // Missing restart data is fatal here: there is nothing to resume from.
    if let Some(step) = resume_step {
        let time = driver
            .resume_from(step)
            .with_context(|| format!("cannot resume from step {step}"))?;
        println!("Resumed from step {step} at t = {time:.9}");
    } else if resume_latest {
        match driver.resume_latest()? {
            Some(step) => println!("Resumed from latest step {step} at t = {:.9}", driver.clock.physical_time),
            None => println!("No checkpoint found, starting fresh."),
        }
    }

    driver.run_steps(steps, dt)?;
    let set = driver.checkpoint_now()?;

    if write_reload {
        let reload = ReloadParticleIo::new(env_cfg, &views(driver.bodies()));
        driver.write_reload(&reload)?;
        println!("Wrote reload layout for {} bodies.", driver.bodies().len());
    }

    print_summary(&driver, &set)?;
    Ok(())
}

fn views(bodies: &[ParticleBlock]) -> Vec<&dyn sphio_core::ParticleBody> {
    bodies.iter().map(|b| b as &dyn sphio_core::ParticleBody).collect()
}

fn print_summary(driver: &SimDriver<ParticleBlock>, set: &sphio_core::CheckpointSet) -> Result<()> {
    println!("=== RUN SUMMARY ===");
    println!("  final step:     {}", driver.clock.iteration);
    println!("  physical time:  {:.9}", driver.clock.physical_time);
    for body in driver.bodies() {
        let mean_z = body.particles.iter().map(|p| p.position[2]).sum::<f64>()
            / body.len().max(1) as f64;
        println!("  {:<14}  {} particles, mean z = {mean_z:.6}", body.name, body.len());
    }
    println!("  checkpoint:     {}", set.time_file.display());
    let steps = driver.restart_io().available_steps()?;
    println!("  checkpoints on disk: {}", serde_json::to_string(&steps)?);
    Ok(())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
