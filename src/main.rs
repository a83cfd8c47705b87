use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{command, Arg, ArgAction, ArgMatches};
use log::info;

use crate::context::Settings;
use crate::ingest::Relocation;
use crate::renderer::CardRenderer;
use crate::slug::CategoryMap;

mod collector;
mod context;
mod error;
mod ingest;
mod metadata;
mod renderer;
mod slug;
mod synchronizer;

/// What a run did, for the summary printed on success.
#[derive(Debug)]
struct Report {
    relocations: Vec<Relocation>,
    documents: Vec<PathBuf>,
}

fn settings_from(matches: &ArgMatches) -> anyhow::Result<Settings> {
    let root: &PathBuf = matches.get_one("root").unwrap();
    if !root.is_dir() {
        bail!("site root {root:?} must be a directory.");
    }

    let mut settings = Settings::new(root);
    settings.staging_dir = matches.get_one::<PathBuf>("staging").unwrap().to_owned();
    settings.category_base = matches.get_one::<String>("categories").unwrap().to_owned();
    settings.index_file = matches.get_one::<String>("index").unwrap().to_owned();
    settings.latest_count = *matches.get_one::<usize>("latest").unwrap();
    settings.required_fields = matches
        .get_many::<String>("require")
        .unwrap()
        .cloned()
        .collect();
    settings.template_dir = matches.get_one::<PathBuf>("template_dir").map(|dir| root.join(dir));

    if let Some(map) = matches.get_one::<PathBuf>("category_map") {
        let path = root.join(map);
        settings.category_map =
            CategoryMap::load(&path).with_context(|| format!("while loading {path:?}"))?;
    }

    Ok(settings)
}

/// Moves every staged file first, and only then rewrites the index documents.
fn organize(settings: &Settings) -> anyhow::Result<Report> {
    let renderer = CardRenderer::new(settings.template_dir.as_deref())
        .context("while loading card templates")?;

    let relocations = ingest::ingest(settings).context("while ingesting staged files")?;
    info!("{} file(s) relocated", relocations.len());

    let posts = collector::collect_posts(settings).context("while collecting posts")?;
    info!("{} post(s) collected", posts.len());

    let documents = synchronizer::synchronize(settings, &renderer, &posts)
        .context("while updating index documents")?;

    Ok(Report {
        relocations,
        documents,
    })
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let matches = command!()
        .about("Files staged posts into category directories and refreshes the index pages")
        .args(&[
            Arg::new("root")
                .help("Site root. Every other path is relative to it.")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("."),
            Arg::new("staging")
                .long("staging")
                .help("Directory holding new posts")
                .value_parser(clap::value_parser!(PathBuf))
                .default_value("blog"),
            Arg::new("categories")
                .long("categories")
                .help("Directory holding one subdirectory per category")
                .default_value("categories"),
            Arg::new("index")
                .long("index")
                .help("File name of the root index and of every category index")
                .default_value("index.mdx"),
            Arg::new("latest")
                .long("latest")
                .help("Number of posts listed after the featured one on the root index")
                .value_parser(clap::value_parser!(usize))
                .default_value("5"),
            Arg::new("category_map")
                .long("category-map")
                .help("YAML file mapping category names to directory names")
                .value_parser(clap::value_parser!(PathBuf)),
            Arg::new("template_dir")
                .long("template-dir")
                .help(
                    "Directory with featured.hbs, latest.hbs or category.hbs \
                     overriding the built-in cards",
                )
                .value_parser(clap::value_parser!(PathBuf)),
            Arg::new("require")
                .long("require")
                .help("Front matter field every staged post must set")
                .action(ArgAction::Append)
                .default_values(["title", "description"]),
        ])
        .get_matches();

    let settings = settings_from(&matches)?;
    let report = organize(&settings)?;

    for relocation in &report.relocations {
        println!(
            "moved {} -> {}",
            relocation.staged.display(),
            relocation.destination.display()
        );
    }
    for document in &report.documents {
        println!("synced {}", document.display());
    }

    Ok(())
}
