//! Output device bring-up: a cpal stream driven by the tone renderer.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::Consumer;

use soundscape::{
    synth::{ToneMessage, ToneRenderer},
    MAX_BLOCK_SIZE,
};

/// Open the default output device and start rendering tones from `rx`.
///
/// The returned stream must be kept alive for as long as audio should play.
pub fn open_output(rx: Consumer<ToneMessage>) -> EyreResult<cpal::Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;
    tracing::info!(sample_rate, channels, "opened output device");

    let mut renderer = ToneRenderer::new(sample_rate, rx);
    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    let (block_l, block_r) = (&mut left[..frames], &mut right[..frames]);
                    renderer.render_block(block_l, block_r);

                    let start = frames_written * channels;
                    let out = &mut data[start..start + frames * channels];
                    let stereo = block_l.iter().zip(block_r.iter());
                    for (frame, (&l, &r)) in out.chunks_exact_mut(channels).zip(stereo) {
                        match frame {
                            [mono] => *mono = 0.5 * (l + r),
                            [fl, fr, rest @ ..] => {
                                *fl = l;
                                *fr = r;
                                rest.fill(0.0);
                            }
                            [] => {}
                        }
                    }

                    frames_written += frames;
                }
            },
            |err| tracing::error!(%err, "audio stream error"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;
    Ok(stream)
}
