use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use skinforge::CosmeticSource as _;

#[derive(Parser, Debug)]
#[command(name = "skinforge", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack a PNG image into skin (or cape) texture bytes.
    Encode(EncodeArgs),
    /// Unpack skin texture bytes into a PNG image.
    Decode(DecodeArgs),
    /// Print the UV bounds of a humanoid model as JSON.
    Bounds(BoundsArgs),
    /// Print the transparent percentage of a skin's visible surface.
    Audit(AuditArgs),
    /// Merge a costume image onto a base skin.
    Costume(CostumeArgs),
    /// List installed costumes and capes.
    List(ListArgs),
}

#[derive(Parser, Debug)]
struct EncodeArgs {
    /// Input PNG.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output packed texture.
    #[arg(long)]
    out: PathBuf,

    /// Pack as a cape (leftmost 64 columns of each row).
    #[arg(long, default_value_t = false)]
    cape: bool,
}

#[derive(Parser, Debug)]
struct DecodeArgs {
    /// Input packed texture.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ModelArgs {
    /// Humanoid model JSON.
    #[arg(long)]
    model: PathBuf,

    /// Geometry to read from the model.
    #[arg(long, default_value = "geometry.humanoid")]
    geometry: String,
}

#[derive(Parser, Debug)]
struct BoundsArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Texture scale factor (1 for 64-wide skins, 2 for 128-wide skins).
    #[arg(long, default_value_t = 1.0)]
    scale: f64,
}

#[derive(Parser, Debug)]
struct AuditArgs {
    #[command(flatten)]
    model: ModelArgs,

    /// Skin to audit: packed texture bytes, or a PNG (packed before auditing).
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct CostumeArgs {
    /// Base skin PNG.
    #[arg(long)]
    base: PathBuf,

    /// Costume overlay PNG.
    #[arg(long)]
    overlay: PathBuf,

    /// Output PNG.
    #[arg(long)]
    out: PathBuf,

    /// Also write the packed texture here.
    #[arg(long)]
    packed: Option<PathBuf>,

    /// Crop the overlay to the skin's aspect ratio instead of fitting it.
    #[arg(long, default_value_t = false)]
    crop: bool,

    /// Draw transparent-black overlay pixels instead of skipping them.
    #[arg(long, default_value_t = false)]
    no_key: bool,
}

#[derive(Parser, Debug)]
struct ListArgs {
    /// Cosmetic options JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the resources directory.
    #[arg(long)]
    resources: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Encode(args) => cmd_encode(args),
        Command::Decode(args) => cmd_decode(args),
        Command::Bounds(args) => cmd_bounds(args),
        Command::Audit(args) => cmd_audit(args),
        Command::Costume(args) => cmd_costume(args),
        Command::List(args) => cmd_list(args),
    }
}

fn cmd_encode(args: EncodeArgs) -> anyhow::Result<()> {
    let img = skinforge::load_image(&args.in_path)?;
    let packed = if args.cape {
        skinforge::encode_cape(&img)?
    } else {
        skinforge::encode_texture(&img)?
    };
    write_bytes(&args.out, packed.as_bytes())?;
    tracing::info!(class = %packed.size_class(), "packed texture");
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_decode(args: DecodeArgs) -> anyhow::Result<()> {
    let bytes = std::fs::read(&args.in_path)
        .with_context(|| format!("read packed texture '{}'", args.in_path.display()))?;
    let img = skinforge::decode_bytes(&bytes)?;
    skinforge::save_png(&args.out, &img)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_bounds(args: BoundsArgs) -> anyhow::Result<()> {
    let model = skinforge::CuboidModel::from_path(&args.model.model, &args.model.geometry)?;
    let cuboids = skinforge::extract_cuboids(&model)?;
    let bounds = skinforge::compute_bounds(&cuboids, args.scale)?;
    println!("{}", serde_json::to_string_pretty(&bounds)?);
    Ok(())
}

fn cmd_audit(args: AuditArgs) -> anyhow::Result<()> {
    let model = skinforge::CuboidModel::from_path(&args.model.model, &args.model.geometry)?;
    let auditor = skinforge::TransparencyAuditor::new(
        skinforge::BoundsTable::from_model(&model)?.shared(),
    );

    let packed = if is_png(&args.in_path) {
        skinforge::encode_texture(&skinforge::load_image(&args.in_path)?)?
    } else {
        let bytes = std::fs::read(&args.in_path)
            .with_context(|| format!("read packed texture '{}'", args.in_path.display()))?;
        skinforge::PackedTexture::from_bytes(bytes)?
    };

    println!("{}", auditor.audit(&packed)?);
    Ok(())
}

fn cmd_costume(args: CostumeArgs) -> anyhow::Result<()> {
    let base = skinforge::load_image(&args.base)?;
    let overlay = skinforge::load_image(&args.overlay)?;

    let opts = skinforge::CompositeOpts {
        crop: args.crop,
        color_key: if args.no_key {
            None
        } else {
            Some(skinforge::ColorKey::default())
        },
    };
    let merged = skinforge::CompositePipeline::new(opts).compose(&base, Some(&overlay))?;

    skinforge::save_png(&args.out, &merged)?;
    eprintln!("wrote {}", args.out.display());

    if let Some(path) = &args.packed {
        let packed = skinforge::encode_texture(&merged)?;
        write_bytes(path, packed.as_bytes())?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let mut opts = match &args.config {
        Some(path) => skinforge::CosmeticOpts::from_path(path)?,
        None => skinforge::CosmeticOpts::default(),
    };
    if let Some(dir) = args.resources {
        opts.resources_dir = dir;
    }

    let source = skinforge::FsCosmeticSource::from_opts(&opts);
    for id in source.costume_ids()? {
        println!("costume\t{id}");
    }
    for id in source.cape_ids()? {
        println!("cape\t{id}");
    }
    Ok(())
}

fn is_png(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("png"))
}

fn write_bytes(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}
