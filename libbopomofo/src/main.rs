use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use libbopomofo::{
    AggregateModel, BopomofoConfig, Config, LanguageModel, LayoutKind, LayoutRegistry,
    ReadingBuffer, Syllable, TextPhraseTable,
};

#[derive(Parser)]
#[command(name = "bopomofo")]
#[command(about = "Bopomofo syllable, keyboard layout and phrase lookup toolkit")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Type keys on a layout and show the resulting syllable
    Compose {
        /// standard, eten, hsu, eten26, ibm or hanyupinyin
        #[arg(short, long, default_value = "standard")]
        layout: LayoutKind,
        /// Spell ü as `v` in the pinyin output
        #[arg(long)]
        use_v: bool,
        keys: String,
    },
    /// Convert one syllable between textual forms
    Convert {
        #[arg(long, value_enum)]
        from: SyllableFormat,
        #[arg(long, value_enum)]
        to: SyllableFormat,
        #[arg(long)]
        use_v: bool,
        text: String,
    },
    /// Print the aggregated unigrams for a key
    Lookup {
        #[command(flatten)]
        sources: SourceArgs,
        /// Print JSON instead of one unigram per line
        #[arg(long)]
        json: bool,
        key: String,
    },
    /// Print the best reading of a value in the language model
    Reading {
        #[command(flatten)]
        sources: SourceArgs,
        value: String,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// TOML config naming the phrase sources
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    model: Option<PathBuf>,
    #[arg(long)]
    user: Option<PathBuf>,
    #[arg(long)]
    excluded: Option<PathBuf>,
    #[arg(long)]
    replacement: Option<PathBuf>,
}

impl SourceArgs {
    fn to_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => BopomofoConfig::load_toml(path)
                .with_context(|| format!("loading {}", path.display()))?
                .into_base(),
            None => Config::default(),
        };
        if let Some(path) = &self.model {
            config.language_model_path = Some(path.clone());
        }
        if let Some(path) = &self.user {
            config.user_phrases_path = Some(path.clone());
        }
        if let Some(path) = &self.excluded {
            config.excluded_phrases_path = Some(path.clone());
        }
        if let Some(path) = &self.replacement {
            config.phrase_replacement_path = Some(path.clone());
            config.phrase_replacement_enabled = true;
        }
        Ok(config)
    }

    fn build_model(&self) -> Result<AggregateModel<TextPhraseTable>> {
        let config = self.to_config()?;
        if config.language_model_path.is_none() && config.user_phrases_path.is_none() {
            bail!("no phrase source given; pass --model, --user or --config");
        }
        Ok(AggregateModel::from_config(&config))
    }
}

#[derive(ValueEnum, Clone, Copy)]
enum SyllableFormat {
    Bopomofo,
    Pinyin,
    Pht,
    Order,
}

fn decode(format: SyllableFormat, text: &str) -> Syllable {
    match format {
        SyllableFormat::Bopomofo => Syllable::from_composed_string(text),
        SyllableFormat::Pinyin => Syllable::from_hanyu_pinyin(text),
        SyllableFormat::Pht => Syllable::from_pht(text),
        SyllableFormat::Order => Syllable::from_absolute_order_string(text),
    }
}

fn encode(format: SyllableFormat, syllable: Syllable, use_v: bool) -> String {
    match format {
        SyllableFormat::Bopomofo => syllable.composed_string(),
        SyllableFormat::Pinyin => syllable.hanyu_pinyin_string(true, use_v),
        SyllableFormat::Pht => syllable.pht_string(true),
        SyllableFormat::Order => syllable.absolute_order_string(),
    }
}

fn handle_compose(layout: LayoutKind, use_v: bool, keys: &str) {
    let registry = LayoutRegistry::new();
    let mut buffer = ReadingBuffer::new(registry.get(layout));
    for key in keys.chars() {
        if !buffer.combine_key(key) {
            eprintln!("warning: key {:?} ignored on the {} layout", key, layout);
        }
    }

    let syllable = buffer.syllable();
    println!("composed: {}", buffer.composed_string());
    println!("syllable: {}", syllable);
    println!("pinyin:   {}", syllable.hanyu_pinyin_string(true, use_v));
    println!("order:    {}", buffer.absolute_order_query_string());
    println!(
        "standard: {}",
        buffer.standard_layout_query_string(&registry.standard())
    );
}

fn handle_lookup(sources: &SourceArgs, json: bool, key: &str) -> Result<()> {
    let model = sources.build_model()?;
    let unigrams = model.get_unigrams(key);
    if json {
        println!("{}", serde_json::to_string_pretty(&unigrams)?);
    } else if unigrams.is_empty() {
        println!("(no unigrams for {:?})", key);
    } else {
        for unigram in &unigrams {
            println!("{}\t{:.4}", unigram.value, unigram.score);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Compose { layout, use_v, keys } => handle_compose(layout, use_v, &keys),
        Commands::Convert {
            from,
            to,
            use_v,
            text,
        } => {
            let syllable = decode(from, &text);
            if syllable.is_empty() {
                bail!("cannot decode {:?}", text);
            }
            println!("{}", encode(to, syllable, use_v));
        }
        Commands::Lookup { sources, json, key } => handle_lookup(&sources, json, &key)?,
        Commands::Reading { sources, value } => {
            let reading = sources.build_model()?.get_reading(&value);
            if reading.is_empty() {
                println!("(no reading for {:?})", value);
            } else {
                println!("{}", reading);
            }
        }
    }
    Ok(())
}
