//! Command line tool to build the popular-words vocabulary from the category tables

use football_ner::{
    cli,
    config::Layout,
    vocabulary::{export_popular_words, Source},
};
use pico_args::Arguments;

const HELP: &str = "\
Usage: export_vocabulary [OPTIONS]

Options:
  -h, --help           Print help
  -c, --config         A JSON layout overriding the default artifact locations
  -d, --data-dir       The path to the top-level data directory (defaults to 'data')
";

#[derive(Debug)]
struct Args {
    config: Option<String>,
    data_dir: Option<String>,
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
            data_dir: pargs.opt_value_from_str(["-d", "--data-dir"])?,
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

    if let Some(data_dir) = args.data_dir {
        layout.data_dir = data_dir;
    }

    let vocabulary = export_popular_words(&Source::from_layout(&layout), layout.vocabulary())?;

    println!(
        "Saved {} popular words to {}",
        vocabulary.len(),
        layout.vocabulary().display()
    );

    Ok(())
}
