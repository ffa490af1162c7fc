//! Command line tool to tag new texts with a trained classifier

use burn::backend::{ndarray::NdArrayDevice, NdArray};
use football_ner::{
    cli::{self, Annotators},
    config::Layout,
    pipelines::token_classification::inference,
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: infer [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         A JSON layout overriding the default artifact locations
  -i, --input-dir      The directory holding the new texts (defaults to 'input')
  -a, --annotator      The annotator to use ('rules' or 'pre-annotated')
  --annotations        A CSV table of pre-computed token annotations
  --no-save            Do not write the extracted features and predictions
";

#[derive(Debug)]
struct Args {
    config: Option<String>,
    input_dir: Option<String>,
    annotator: Option<String>,
    annotations: Option<String>,
    save: bool,
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
            input_dir: pargs.opt_value_from_str(["-i", "--input-dir"])?,
            annotator: pargs.opt_value_from_str(["-a", "--annotator"])?,
            annotations: pargs.opt_value_from_str("--annotations")?,
            save: !(pargs.contains("--no-save")),
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

    if let Some(input_dir) = args.input_dir {
        layout.input_dir = input_dir;
    }

    let annotator = Annotators::select(args.annotator.as_deref(), args.annotations.as_deref())?
        .init(args.annotations.as_deref())?;

    let predictions =
        inference::run::<NdArray, _>(&layout, annotator, NdArrayDevice::Cpu, args.save)?;

    for (token, label) in predictions.tagged() {
        println!("{token}\t{label}");
    }

    Ok(())
}
