use argh::FromArgs;
use std::path::PathBuf;

use hog::{
    descriptor::{AngleConvention, ExecutionStrategy, HogConfig, HogPipeline, RecordingObserver},
    io::{
        functional as F,
        json::{read_json, write_features_json},
        observer::FEATURES_FILE,
        JsonDumpObserver,
    },
};

#[derive(FromArgs)]
/// Compute the HOG descriptor of an image
struct Args {
    /// path to an input image
    #[argh(positional)]
    image_path: PathBuf,

    /// directory where the outputs are written (default: current directory)
    #[argh(option, short = 'o', default = "PathBuf::from(\".\")")]
    output_dir: PathBuf,

    /// path to a json file with the descriptor configuration
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// number of orientation bins, overrides the configuration file
    #[argh(option, short = 'b')]
    bins: Option<usize>,

    /// use atan2 angles in [0, 180) instead of the folded angles
    #[argh(switch, short = 'u')]
    unsigned: bool,

    /// process the rows in parallel
    #[argh(switch, short = 'p')]
    parallel: bool,

    /// dump the intermediate grids as json into the output directory
    #[argh(switch, short = 'd')]
    dump: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    // build the configuration
    let mut config: HogConfig = match &args.config {
        Some(path) => read_json(path)?,
        None => HogConfig::default(),
    };
    if let Some(bins) = args.bins {
        config = config.with_bin_count(bins);
    }
    if args.unsigned {
        config = config.with_angle_convention(AngleConvention::Unsigned);
    }
    if args.parallel {
        config = config.with_strategy(ExecutionStrategy::ParallelRows);
    }

    // read the image at the detection window size
    let gray = F::read_image_gray_resized(&args.image_path, F::DETECTION_WINDOW)?;
    let image = F::gray_to_intensity(&gray)?;

    std::fs::create_dir_all(&args.output_dir)?;

    let pipeline = HogPipeline::new(config)?;
    let mut recorder = RecordingObserver::default();

    let descriptor = if args.dump {
        let dump = JsonDumpObserver::new(&args.output_dir)?;
        pipeline.compute_with_observer(&image, &mut (&mut recorder, dump))?
    } else {
        pipeline.compute_with_observer(&image, &mut recorder)?
    };

    log::info!("computed {} features", descriptor.len());

    // the dump observer already wrote the features
    if !args.dump {
        write_features_json(args.output_dir.join(FEATURES_FILE), &descriptor)?;
    }

    // render the gradient magnitudes
    if let Some(polar) = recorder.polar {
        let magnitude = F::intensity_to_gray(&polar.magnitude, f64::from(F::INTENSITY_FACTOR))?;
        F::write_image_gray(args.output_dir.join("magnitude.png"), &magnitude)?;
    }

    Ok(())
}
