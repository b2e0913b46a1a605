use std::io::{self, Write};

use anyhow::{bail, Context};
use colored::Colorize;
use serde_json::json;
use stock_core::{
    AddOutcome, BarcodeId, Brand, ImageUpdate, LoadOutcome, NewStockItem, Removal, Stock,
    StockConfig, StockStore,
};
use stock_scan::{scan_once, LineScanner, Scanner};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let store = config
        .open_store()
        .with_context(|| format!("opening stock in {}", config.data_dir.display()))?;
    if let LoadOutcome::Reset(reason) = store.load_outcome() {
        eprintln!(
            "{} saved stock could not be read ({reason}); starting empty",
            "warning:".yellow().bold()
        );
    }

    let format = cli.format;
    let mut out = io::stdout().lock();
    match cli.command {
        Command::Add(args) => cmd_add(&store, args, format, &mut out),
        Command::Scan(args) => cmd_scan(&store, args, format, &mut out),
        Command::List(args) => cmd_list(&store.snapshot(), args, format, &mut out),
        Command::Find(args) => cmd_find(&store.snapshot(), &args.barcode, format, &mut out),
        Command::Delete(args) => cmd_delete(&store, args.target, format, &mut out),
        Command::Image(args) => cmd_image(&store, args.target, format, &mut out),
        Command::Export => {
            writeln!(out, "{}", stock_types::encode_pretty(&store.snapshot())?)?;
            Ok(())
        }
    }
}

fn resolve_config(cli: &Cli) -> anyhow::Result<StockConfig> {
    let mut config = match &cli.config {
        Some(path) => StockConfig::load(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => StockConfig::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(key) = &cli.key {
        config.storage_key = key.clone();
    }
    Ok(config)
}

fn new_item(
    brand: &str,
    model: &str,
    barcode: &str,
    brand_image: Option<&str>,
    model_image: Option<&str>,
) -> NewStockItem {
    let mut item = NewStockItem::new(brand, model, barcode);
    if let Some(url) = brand_image {
        item = item.with_brand_image(url);
    }
    if let Some(url) = model_image {
        item = item.with_model_image(url);
    }
    item
}

fn cmd_add(
    store: &StockStore,
    args: AddArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let entry = new_item(
        &args.brand,
        &args.model,
        &args.barcode,
        args.brand_image.as_deref(),
        args.model_image.as_deref(),
    )
    .validate()?;
    let outcome = entry.apply(store);
    print_add(out, entry.brand(), entry.model(), entry.barcode(), &outcome, format)
}

fn cmd_scan(
    store: &StockStore,
    args: ScanArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    // Reject a blank brand/model before waiting on the scanner.
    new_item(&args.brand, &args.model, "-", None, None).validate()?;

    let mut scanner = LineScanner::new(io::stdin().lock());
    let record = |value: &str, out: &mut dyn Write| -> anyhow::Result<()> {
        let entry = new_item(
            &args.brand,
            &args.model,
            value,
            args.brand_image.as_deref(),
            args.model_image.as_deref(),
        )
        .validate()?;
        let outcome = entry.apply(store);
        print_add(out, entry.brand(), entry.model(), entry.barcode(), &outcome, format)
    };

    if !args.continuous {
        let Some(event) = scan_once(&mut scanner)? else {
            bail!("no barcode scanned");
        };
        return record(&event.value, out);
    }

    let mut scanned = 0usize;
    while let Some(event) = scanner.next_scan()? {
        record(&event.value, &mut *out)?;
        scanned += 1;
    }
    scanner.close();
    if format == OutputFormat::Text {
        writeln!(out, "{} scanned", scanned.to_string().bold())?;
    }
    Ok(())
}

fn print_add(
    out: &mut (impl Write + ?Sized),
    brand: &str,
    model: &str,
    barcode: &str,
    outcome: &AddOutcome,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "brand": brand,
                "model": model,
                "barcode": barcode,
                "id": outcome.id().as_str(),
                "added": outcome.is_added(),
            });
            writeln!(out, "{value}")?;
        }
        OutputFormat::Text => match outcome {
            AddOutcome::Added(id) => writeln!(
                out,
                "{} {} → {} / {}  ({})",
                "✓".green().bold(),
                barcode.bold(),
                brand.yellow(),
                model.cyan(),
                id.short_id().dimmed()
            )?,
            AddOutcome::Duplicate(_) => writeln!(
                out,
                "{} {} already in {} / {}",
                "=".dimmed(),
                barcode.bold(),
                brand.yellow(),
                model.cyan()
            )?,
        },
    }
    Ok(())
}

fn cmd_list(
    stock: &Stock,
    args: ListArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let brands: Vec<&Brand> = match &args.brand {
        Some(name) => stock.brand(name).into_iter().collect(),
        None => stock.brands().collect(),
    };

    if format == OutputFormat::Json {
        let mut map = serde_json::Map::new();
        for brand in &brands {
            map.insert(brand.name.clone(), serde_json::to_value(brand)?);
        }
        writeln!(out, "{}", serde_json::to_string_pretty(&map)?)?;
        return Ok(());
    }

    if brands.is_empty() {
        writeln!(out, "No stock yet. Add items with `stock add` or `stock scan`.")?;
        return Ok(());
    }
    for brand in brands {
        write!(out, "{}", brand.name.yellow().bold())?;
        if let Some(url) = &brand.image_url {
            write!(out, "  {}", url.blue())?;
        }
        writeln!(out)?;
        for model in brand.models.values() {
            write!(out, "  {} ({})", model.name.cyan(), model.len())?;
            if let Some(url) = &model.image_url {
                write!(out, "  {}", url.blue())?;
            }
            writeln!(out)?;
            for item in &model.barcodes {
                writeln!(
                    out,
                    "    {}  {}  {}",
                    item.id.short_id().dimmed(),
                    item.value,
                    item.added_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
                )?;
            }
        }
    }
    writeln!(
        out,
        "\n{} brands, {} models, {} barcodes",
        stock.brand_count(),
        stock.model_count(),
        stock.barcode_count()
    )?;
    Ok(())
}

fn cmd_find(
    stock: &Stock,
    barcode: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let hits: Vec<_> = stock.find_barcode(barcode).collect();
    match format {
        OutputFormat::Json => {
            let value: Vec<_> = hits
                .iter()
                .map(|(brand, model, item)| {
                    json!({
                        "brand": brand.name,
                        "model": model.name,
                        "id": item.id.as_str(),
                        "addedAt": item.added_at,
                    })
                })
                .collect();
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
        OutputFormat::Text if hits.is_empty() => {
            writeln!(out, "{} not in stock", barcode.bold())?;
        }
        OutputFormat::Text => {
            for (brand, model, item) in hits {
                writeln!(
                    out,
                    "{} / {}  {}",
                    brand.name.yellow(),
                    model.name.cyan(),
                    item.id.as_str().dimmed()
                )?;
            }
        }
    }
    Ok(())
}

fn cmd_delete(
    store: &StockStore,
    target: DeleteTarget,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (label, removal) = match target {
        DeleteTarget::Barcode { brand, model, id } => {
            let id = resolve_barcode_id(&store.snapshot(), &brand, &model, &id)?;
            let removal = store.delete_barcode(&brand, &model, &id);
            (format!("barcode {id} in {brand} / {model}"), removal)
        }
        DeleteTarget::Model { brand, model } => {
            (format!("model {brand} / {model}"), store.delete_model(&brand, &model))
        }
        DeleteTarget::Brand { brand } => (format!("brand {brand}"), store.delete_brand(&brand)),
    };
    print_removal(out, &label, &removal, format)
}

/// Expand a unique id prefix within the model to the full id.
///
/// Unknown ids are passed through unchanged; deleting them is a no-op.
fn resolve_barcode_id(
    stock: &Stock,
    brand: &str,
    model: &str,
    id: &str,
) -> anyhow::Result<BarcodeId> {
    if id.is_empty() {
        bail!("barcode id must not be empty");
    }
    let exact = BarcodeId::from(id);
    let Some(model) = stock.model(brand, model) else {
        return Ok(exact);
    };
    if model.barcode(&exact).is_some() {
        return Ok(exact);
    }
    let matches: Vec<&BarcodeId> = model
        .barcodes
        .iter()
        .map(|item| &item.id)
        .filter(|candidate| candidate.as_str().starts_with(id))
        .collect();
    match matches.as_slice() {
        [single] => Ok((*single).clone()),
        [] => Ok(exact),
        _ => bail!("barcode id prefix {id:?} matches {} entries", matches.len()),
    }
}

fn print_removal(
    out: &mut impl Write,
    label: &str,
    removal: &Removal,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            let value = json!({
                "target": label,
                "barcodes": removal.barcodes,
                "models": removal.models,
                "brand": removal.brand,
            });
            writeln!(out, "{value}")?;
        }
        OutputFormat::Text if removal.is_noop() => {
            writeln!(out, "{} nothing to delete for {label}", "=".dimmed())?;
        }
        OutputFormat::Text => {
            write!(
                out,
                "{} Deleted {label}: {} barcodes, {} models",
                "✓".green().bold(),
                removal.barcodes,
                removal.models
            )?;
            if removal.brand {
                write!(out, ", brand removed")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn cmd_image(
    store: &StockStore,
    target: ImageTarget,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let (label, update) = match target {
        ImageTarget::Brand { brand, url } => {
            (format!("brand {brand}"), ImageUpdate::brand(brand, url))
        }
        ImageTarget::Model { brand, model, url } => {
            (format!("model {brand} / {model}"), ImageUpdate::model(brand, model, url))
        }
    };
    let applied = update.validate()?.apply(store);
    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", json!({ "target": label, "applied": applied }))?;
        }
        OutputFormat::Text if applied => {
            writeln!(out, "{} Image set for {label}", "✓".green().bold())?;
        }
        OutputFormat::Text => writeln!(out, "{} {label} not found", "=".dimmed())?,
    }
    Ok(())
}
