use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use churn_lens::{load_file, render, Args, ChurnLensApp};
use clap::Parser;
use eframe::egui;

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .init();

    if let Some(out) = &args.export {
        return export(&args, out);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let mut app = ChurnLensApp::new(args.defaults());
    if let Some(path) = args.data_path() {
        app.state.load_path(&path);
    }

    eframe::run_native(
        "Churn Lens – Bank Customer Churn Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard window: {e}"))
}

/// Headless mode: render one filter selection and write the view as JSON.
fn export(args: &Args, out: &Path) -> Result<()> {
    let data = args
        .data_path()
        .context("no dataset given and bank_customer_churn_data.csv not found")?;
    let dataset = load_file(&data)?;
    let view = render(&dataset, &args.criteria(&dataset));
    log::info!(
        "Exporting view of {} customers to {}",
        view.customer_count,
        out.display()
    );

    let json = serde_json::to_string_pretty(&view).context("serializing view")?;
    if out == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{json}").context("writing to stdout")?;
    } else {
        std::fs::write(out, json).with_context(|| format!("writing {}", out.display()))?;
    }
    Ok(())
}
