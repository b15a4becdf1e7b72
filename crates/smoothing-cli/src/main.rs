use std::{path::PathBuf, sync::Arc};

use argh::FromArgs;

use smoothing_core::{SmoothingConfig, SmoothingError};
use smoothing_element::{Caps, CollectSink, Event, PixelFormat, PropertyId, SmoothingElement};

#[derive(FromArgs)]
/// Smooth an image with a Gaussian kernel in linear light
struct Args {
    /// path to the input image
    #[argh(option, short = 'i')]
    input: Option<PathBuf>,

    /// path to the output image
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// the size index n of the kernel, the kernel is 2n+1 pixels square
    #[argh(option)]
    kernel_size: Option<usize>,

    /// the sigma of the gaussian kernel
    #[argh(option)]
    sigma: Option<f32>,

    /// a json file with the filter configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// print the element properties and exit
    #[argh(switch)]
    list_properties: bool,
}

/// Describe the element and its properties with their defaults.
fn describe_element() -> String {
    let mut out = format!(
        "{}: {}\n",
        SmoothingElement::<CollectSink>::NAME,
        SmoothingElement::<CollectSink>::DESCRIPTION
    );
    for id in PropertyId::ALL {
        out.push_str(&format!(
            "  {} (default {}): {}\n",
            id.name(),
            id.default_value(),
            id.blurb()
        ));
    }
    out
}

/// Read a filter configuration from a json file.
fn load_config(path: &std::path::Path) -> Result<SmoothingConfig, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: SmoothingConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Merge the configuration file with the command line flags, the flags win.
fn resolve_config(
    base: SmoothingConfig,
    kernel_size: Option<usize>,
    sigma: Option<f32>,
) -> Result<SmoothingConfig, SmoothingError> {
    let mut config = base;
    if let Some(kernel_size) = kernel_size {
        config = config.with_kernel_size(kernel_size);
    }
    if let Some(sigma) = sigma {
        config = config.with_sigma(sigma);
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    if args.list_properties {
        print!("{}", describe_element());
        return Ok(());
    }

    let input = args.input.as_ref().ok_or("missing --input")?;
    let output = args.output.as_ref().ok_or("missing --output")?;

    let base = match &args.config {
        Some(path) => load_config(path)?,
        None => SmoothingConfig::default(),
    };
    let config = resolve_config(base, args.kernel_size, args.sigma)?;

    let img = image::open(input)?.into_rgb8();
    let (width, height) = img.dimensions();
    log::info!(
        "smoothing {} ({width}x{height}) with kernel_size={} sigma={}",
        input.display(),
        config.kernel_size,
        config.sigma
    );

    let sink = Arc::new(CollectSink::new());
    let element = SmoothingElement::with_config(&config, sink.clone())?;

    element.handle_event(Event::Caps(Caps::new(
        PixelFormat::Rgb,
        width as usize,
        height as usize,
    )))?;
    element.chain(img.into_raw())?;
    element.handle_event(Event::Eos)?;

    let frame = sink
        .take_buffers()?
        .pop()
        .ok_or("the element produced no frame")?;

    let smoothed = image::RgbImage::from_raw(width, height, frame)
        .ok_or("the smoothed frame does not match the image size")?;
    smoothed.save(output)?;

    log::info!("saved {}", output.display());

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();
    run(&args)
}
