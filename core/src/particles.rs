//! A plain particle block: the concrete body used by the runner and tests.
//!
//! Formats:
//!   - restart: JSON, full state (position, velocity, mass, density).
//!   - reload:  JSON, layout only (position, mass). Loading it zeroes
//!     velocities and resets density to the block's rest density.
//!   - recording: whitespace-separated table with a `#` header.

use crate::{body::ParticleBody, rng::LayoutRng};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Particle {
    pub position: [f64; 3],
    pub velocity: [f64; 3],
    pub mass:     f64,
    pub density:  f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
struct LayoutParticle {
    position: [f64; 3],
    mass:     f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct RestartFile {
    body:      String,
    particles: Vec<Particle>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReloadFile {
    body:      String,
    particles: Vec<LayoutParticle>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleBlock {
    pub name:         String,
    pub rest_density: f64,
    pub particles:    Vec<Particle>,
}

impl ParticleBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:         name.into(),
            rest_density: 1.0,
            particles:    Vec::new(),
        }
    }

    /// A cubic lattice of `per_side`³ particles at `spacing`, resting.
    pub fn lattice(name: impl Into<String>, per_side: usize, spacing: f64) -> Self {
        let mut block = Self::new(name);
        let mass = spacing.powi(3) * block.rest_density;
        for i in 0..per_side {
            for j in 0..per_side {
                for k in 0..per_side {
                    block.particles.push(Particle {
                        position: [i as f64 * spacing, j as f64 * spacing, k as f64 * spacing],
                        velocity: [0.0; 3],
                        mass,
                        density: block.rest_density,
                    });
                }
            }
        }
        block
    }

    /// `count` particles scattered uniformly in `[0, extent)³`.
    pub fn random(name: impl Into<String>, count: usize, extent: f64, rng: &mut LayoutRng) -> Self {
        let mut block = Self::new(name);
        let mass = extent.powi(3) * block.rest_density / count.max(1) as f64;
        for _ in 0..count {
            let position = [
                rng.uniform(0.0, extent),
                rng.uniform(0.0, extent),
                rng.uniform(0.0, extent),
            ];
            block.particles.push(Particle {
                position,
                velocity: [0.0; 3],
                mass,
                density: block.rest_density,
            });
        }
        block
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Push apart every pair closer than `min_distance`, `sweeps` times.
    /// Produces a more uniform layout from a random scatter.
    pub fn relax(&mut self, min_distance: f64, sweeps: usize) {
        for _ in 0..sweeps {
            let n = self.particles.len();
            let mut shift = vec![[0.0f64; 3]; n];
            for a in 0..n {
                for b in (a + 1)..n {
                    let pa = self.particles[a].position;
                    let pb = self.particles[b].position;
                    let d = [pb[0] - pa[0], pb[1] - pa[1], pb[2] - pa[2]];
                    let dist = (d[0] * d[0] + d[1] * d[1] + d[2] * d[2]).sqrt();
                    if dist >= min_distance || dist == 0.0 {
                        continue;
                    }
                    let push = 0.5 * (min_distance - dist) / dist;
                    for axis in 0..3 {
                        shift[a][axis] -= push * d[axis];
                        shift[b][axis] += push * d[axis];
                    }
                }
            }
            for (p, s) in self.particles.iter_mut().zip(&shift) {
                for axis in 0..3 {
                    p.position[axis] += s[axis];
                }
            }
        }
    }

    /// Move every particle along its velocity for `dt`.
    pub fn drift(&mut self, dt: f64) {
        for p in &mut self.particles {
            for axis in 0..3 {
                p.position[axis] += p.velocity[axis] * dt;
            }
        }
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> anyhow::Result<T> {
    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let value = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Cannot parse {}", path.display()))?;
    Ok(value)
}

impl ParticleBody for ParticleBlock {
    fn name(&self) -> &str {
        &self.name
    }

    fn recording_extension(&self) -> &str {
        "dat"
    }

    fn restart_extension(&self) -> &str {
        "json"
    }

    fn reload_extension(&self) -> &str {
        "json"
    }

    fn write_for_recording(&self, path: &Path) -> anyhow::Result<()> {
        let file = File::create(path).with_context(|| format!("Cannot create {}", path.display()))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "# body={} particles={}", self.name, self.particles.len())?;
        writeln!(out, "# x y z vx vy vz mass density")?;
        for p in &self.particles {
            writeln!(
                out,
                "{:.9} {:.9} {:.9} {:.9} {:.9} {:.9} {:.9} {:.9}",
                p.position[0], p.position[1], p.position[2],
                p.velocity[0], p.velocity[1], p.velocity[2],
                p.mass, p.density,
            )?;
        }
        out.flush()?;
        Ok(())
    }

    fn write_for_restart(&self, path: &Path) -> anyhow::Result<()> {
        write_json(path, &RestartFile {
            body:      self.name.clone(),
            particles: self.particles.clone(),
        })
    }

    fn read_for_restart(&mut self, path: &Path) -> anyhow::Result<()> {
        let file: RestartFile = read_json(path)?;
        if file.body != self.name {
            log::warn!("Restart file {} was written by body '{}'", path.display(), file.body);
        }
        self.particles = file.particles;
        Ok(())
    }

    fn write_for_reload(&self, path: &Path) -> anyhow::Result<()> {
        let particles = self
            .particles
            .iter()
            .map(|p| LayoutParticle { position: p.position, mass: p.mass })
            .collect();
        write_json(path, &ReloadFile { body: self.name.clone(), particles })
    }

    fn read_for_reload(&mut self, path: &Path) -> anyhow::Result<()> {
        let file: ReloadFile = read_json(path)?;
        let density = self.rest_density;
        self.particles = file
            .particles
            .into_iter()
            .map(|l| Particle {
                position: l.position,
                velocity: [0.0; 3],
                mass: l.mass,
                density,
            })
            .collect();
        log::debug!(
            "Body '{}' took {} particles from layout '{}'",
            self.name,
            self.particles.len(),
            file.body
        );
        Ok(())
    }
}
