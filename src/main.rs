use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pagediff::cli::CliArgs;
use pagediff::{
    CompareConfig, CompareFilesResult, DocumentSource, MaskRegion, Options, RenderConfig,
    compare_files,
};
use serde_json::json;

#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    let masks = match load_masks(&args) {
        Ok(masks) => masks,
        Err(message) => {
            eprintln!("pagediff: {message}");
            return ExitCode::FAILURE;
        }
    };

    let options = Options {
        result_dir: args.result_dir.clone(),
        render: RenderConfig { dpi: args.dpi },
        compare: CompareConfig {
            threshold: args.threshold,
            include_aa: args.include_aa,
            combine_images: args.combine,
            excluded_pages: args.exclude_pages.clone(),
            masks,
        },
    };

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::with_template("{spinner:.green} comparing {msg}")
            .expect("static template is valid"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message(format!(
        "{} vs {}",
        args.baseline.display(),
        args.actual.display()
    ));

    let result = compare_files(
        DocumentSource::Path(args.baseline.clone()),
        DocumentSource::Path(args.actual.clone()),
        options,
    )
    .await;

    progress.finish_and_clear();
    report(&args, &result);

    if result.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn load_masks(args: &CliArgs) -> Result<Vec<MaskRegion>, String> {
    let Some(path) = &args.masks_file else {
        return Ok(Vec::new());
    };
    let contents = std::fs::read_to_string(path)
        .map_err(|err| format!("failed to read masks file {}: {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("failed to parse masks file {}: {err}", path.display()))
}

fn report(args: &CliArgs, result: &CompareFilesResult) {
    if args.json {
        let payload = json!({
            "passed": result.verdict.passed,
            "message": result.verdict.message,
            "excluded_pages": result.verdict.excluded_pages,
            "different_pages": result.verdict.different_pages,
            "error": result.error.as_ref().map(|err| err.to_string()),
        });
        println!("{payload:#}");
        return;
    }

    println!("{}", result.verdict.message);
    if !result.verdict.different_pages.is_empty() {
        let pages: Vec<String> = result
            .verdict
            .different_pages
            .iter()
            .map(u32::to_string)
            .collect();
        println!("different pages: {}", pages.join(", "));
    }
    if !result.verdict.excluded_pages.is_empty() {
        let pages: Vec<String> = result
            .verdict
            .excluded_pages
            .iter()
            .map(u32::to_string)
            .collect();
        println!("excluded pages: {}", pages.join(", "));
    }
    if let Some(error) = &result.error {
        eprintln!("pagediff: {error}");
    }
}
