//! Command line tool to extract features from the training texts and fit the classifier

use burn::backend::{ndarray::NdArrayDevice, Autodiff, NdArray};
use football_ner::{
    cli::{self, Annotators},
    config::Layout,
    pipelines::token_classification::training,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: train [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         A JSON layout overriding the default artifact locations
  -t, --training       A JSON training config overriding the default hyperparameters
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
  -n, --num-epochs     Number of epochs to train for
  -b, --batch-size     Batch size
  -a, --annotator      The annotator to use ('rules' or 'pre-annotated')
  --annotations        A CSV table of pre-computed token annotations
  --no-tui             Disable TUI
";

#[derive(Debug)]
struct Args {
    config: Option<String>,
    training: Option<String>,
    data_dir: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    annotator: Option<String>,
    annotations: Option<String>,
    use_tui: bool,
}

impl Args {
    fn parse() -> anyhow::Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            config: pargs.opt_value_from_str(["-c", "--config"])?,
            training: pargs.opt_value_from_str(["-t", "--training"])?,
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            annotator: pargs.opt_value_from_str(["-a", "--annotator"])?,
            annotations: pargs.opt_value_from_str("--annotations")?,
            use_tui: !(pargs.contains("--no-tui")),
        };

        Ok(Some(args))
    }
}

fn main() -> anyhow::Result<()> {
    cli::init_logger();

    let Some(args) = Args::parse()? else {
        print!("{}", HELP);

        return Ok(());
    };

    let mut layout = Layout::load_or_default(args.config.as_deref())?;

    if let Some(data_dir) = &args.data_dir {
        layout.data_dir = data_dir.to_string();
    }

    let mut config = training::Config::load_or_default(args.training.as_deref())?;

    if let Some(num_epochs) = args.num_epochs {
        config.num_epochs = num_epochs;
    }

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    let annotator = Annotators::select(args.annotator.as_deref(), args.annotations.as_deref())?
        .init(args.annotations.as_deref())?;

    let device = NdArrayDevice::Cpu;

    let trained = training::run::<Autodiff<NdArray>, _>(
        &layout,
        annotator,
        &config,
        vec![device],
        args.use_tui,
    )?;

    println!("{}", trained.report);

    Ok(())
}
