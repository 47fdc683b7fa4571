use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Mat4;
use scene_ingest::gpu::{FileImageDecoder, FrameCommand, FrameRecorder, GpuDevice, HeadlessDevice, WgpuDevice};
use scene_ingest::model::{set_final_bone_matrices, Model, NamingConvention, MAX_BONES};
use scene_ingest::SunLight;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scene file to ingest (.gltf, .glb or .obj)
    model: PathBuf,

    /// Ingest without a GPU adapter
    #[arg(long)]
    headless: bool,

    /// Upload images as stored instead of flipping them vertically
    #[arg(long)]
    no_flip: bool,

    /// Record the frame with lighting disabled
    #[arg(long)]
    no_lighting: bool,

    /// Log every command of the recorded frame
    #[arg(long)]
    dump_frame: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    std::fs::metadata(&args.model).with_context(|| format!("Cannot read {}", args.model.display()))?;

    let decoder = FileImageDecoder {
        flip_vertically: !args.no_flip,
    };
    let convention = NamingConvention::default();

    if args.headless {
        return run(HeadlessDevice::new(), &args, &decoder, &convention);
    }

    match WgpuDevice::request() {
        Ok(device) => run(device, &args, &decoder, &convention),
        Err(e) => {
            log::warn!("{}, falling back to headless ingestion", e);
            run(HeadlessDevice::new(), &args, &decoder, &convention)
        }
    }
}

/// Ingests the model, then records one frame the way a renderer would issue it.
fn run<G: GpuDevice>(
    mut device: G,
    args: &Args,
    decoder: &FileImageDecoder,
    convention: &NamingConvention,
) -> Result<()> {
    let model = Model::load(&args.model, &mut device, decoder, convention);
    if model.is_empty() {
        anyhow::bail!("No meshes ingested from {}", args.model.display());
    }

    let environment = device.create_placeholder_texture("skybox");
    let bind_pose = vec![Mat4::IDENTITY; model.bone_count().min(MAX_BONES)];
    let lighting = !args.no_lighting;

    let mut frame = FrameRecorder::<G>::new();
    if lighting {
        SunLight::new().write(&mut frame);
    }
    set_final_bone_matrices(&mut frame, &bind_pose);
    model.draw(&mut frame, lighting, Some(&environment));

    if args.dump_frame {
        let mut draws = 0;
        for command in frame.commands() {
            match command {
                FrameCommand::SetUniform { name, value } => log::info!("uniform {} = {:?}", name, value),
                FrameCommand::BindTexture { unit, sampler, .. } => log::info!("bind unit {} as {}", unit, sampler),
                FrameCommand::SetBlending(enabled) => log::info!("blending {}", if *enabled { "on" } else { "off" }),
                FrameCommand::Draw { .. } => {
                    let name = model.meshes().get(draws).map(|mesh| mesh.name.as_str()).unwrap_or("");
                    log::info!("draw {} ({})", draws, name);
                    draws += 1;
                }
            }
        }
    }

    println!("{}: {}", args.model.display(), model.summary());
    println!(
        "frame: {} draw calls, {} uniforms",
        frame.draw_count(),
        frame.uniforms().len()
    );
    Ok(())
}
