#[macro_use]
extern crate log;
#[macro_use]
extern crate clap;
extern crate pigsty;

use clap::ArgMatches;
use pigsty::backend::FileProbe;
use pigsty::formats::hir::load_hir;
use pigsty::formats::index::TextureIndexKind;
use pigsty::formats::mad::{load_mad, EmptySlotPolicy};
use pigsty::logger;
use pigsty::model::load_model;
use pigsty::{CacheConfig, ModelCache, PigClass, Result};
use std::path::{Path, PathBuf};
use std::process::exit;

fn main() {
    let app = clap_app!(pigsty =>
        (@setting SubcommandRequiredElseHelp)
        (version: crate_version!())
        (about: "Hogs of War character asset loader")
        (@arg verbose: -v ... +global "Log more (-v info, -vv debug, -vvv trace)")
        (@arg config: --config +takes_value +global "JSON file overriding the default configuration")
        (@arg skip_blank: --("skip-blank") +global "Let unnamed animation slots be empty")
        (@subcommand info =>
            (about: "Build the whole model cache and summarize it")
            (alias: "i")
            (@arg DATA_DIR: +required "Game data directory (containing chars/)")
        )
        (@subcommand hir =>
            (about: "Dump a bone hierarchy")
            (@arg FILE: +required ".hir file")
        )
        (@subcommand mad =>
            (about: "List the animations in a capture file")
            (@arg FILE: +required ".mad file")
        )
        (@subcommand model =>
            (about: "Load one mesh with its .fac and .no2 companions")
            (@arg VTX: +required ".vtx file")
            (@arg skeleton: --skeleton +takes_value ".hir file to bind the mesh to")
        )
    );
    let matches = app.get_matches();

    logger::init(logger::level_for_verbosity(matches.occurrences_of("verbose")));

    if let Err(e) = run(&matches) {
        error!("{}", e);
        for cause in e.iter().skip(1) {
            error!("caused by: {}", cause);
        }
        exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<()> {
    let mut config = match matches.value_of_os("config") {
        Some(path) => CacheConfig::load(Path::new(path))?,
        None => CacheConfig::default(),
    };
    if matches.is_present("skip_blank") {
        config.empty_slot_policy = EmptySlotPolicy::SkipBlank;
    }

    match matches.subcommand() {
        ("info", Some(m)) => {
            config.data_dir = PathBuf::from(m.value_of_os("DATA_DIR").unwrap_or_default());
            info(config)
        }
        ("hir", Some(m)) => hir(&config, Path::new(m.value_of_os("FILE").unwrap_or_default())),
        ("mad", Some(m)) => mad(&config, Path::new(m.value_of_os("FILE").unwrap_or_default())),
        ("model", Some(m)) => model(
            &config,
            Path::new(m.value_of_os("VTX").unwrap_or_default()),
            m.value_of_os("skeleton").map(Path::new),
        ),
        _ => Ok(()),
    }
}

fn info(config: CacheConfig) -> Result<()> {
    let mut backend = FileProbe::default();
    let mut cache = ModelCache::<FileProbe>::new(config);
    cache.rebuild(&mut backend)?;

    println!("Bones: {}", cache.num_bones());
    let animations = cache.animations()?;
    let num_named = animations.iter().filter(|a| !a.name.trim().is_empty()).count();
    println!("Animations: {} ({} named)", animations.len(), num_named);
    for &kind in &TextureIndexKind::ALL {
        if let Some(index) = cache.texture_index(kind) {
            println!("Texture index {}: {} textures", kind, index.len());
        }
    }
    for &class in &PigClass::ALL {
        if let Some(model) = cache.model(class) {
            println!("{:<9} {:>5} vertices {:>5} triangles {:>5} quads{}",
                class.name(),
                model.vertices.len(),
                model.num_triangles(),
                model.num_quads(),
                if model.normals_synthesized { "  (generated normals)" } else { "" },
            );
        }
    }
    Ok(())
}

fn hir(config: &CacheConfig, path: &Path) -> Result<()> {
    let bones = load_hir(path, &config.bone_names, config.max_bones)?;
    for (i, bone) in bones.iter().enumerate() {
        let parent = match bone.parent {
            Some(p) => p.to_string(),
            None => "-".to_string(),
        };
        println!("{:>3} {:<12} parent {:>3}  ({}, {}, {})",
            i, bone.name, parent, bone.coord.x, bone.coord.y, bone.coord.z);
    }
    Ok(())
}

fn mad(config: &CacheConfig, path: &Path) -> Result<()> {
    let animations = load_mad(path, &config.animation_names, config.empty_slot_policy)?;
    for (i, anim) in animations.iter().enumerate() {
        let name: &str = if anim.name.is_empty() { "(unnamed)" } else { &anim.name };
        println!("{:>3} {:<28} {} frames", i, name, anim.num_frames());
    }
    Ok(())
}

fn model(config: &CacheConfig, vtx_path: &Path, skeleton: Option<&Path>) -> Result<()> {
    let bones = match skeleton {
        Some(path) => load_hir(path, &config.bone_names, config.max_bones)?,
        None => vec![],
    };
    let model = load_model(vtx_path, &bones)?;
    println!("Vertices: {}", model.vertices.len());
    println!("Triangles: {}", model.num_triangles());
    println!("Quads: {}", model.num_quads());
    println!("Normals: {}{}", model.normals.len(),
        if model.normals_synthesized { " (generated)" } else { "" });
    println!("Bones: {}", model.bones.len());
    let textures = model.texture_indices().iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>();
    println!("Texture slots: {}", textures.join(" "));
    Ok(())
}
