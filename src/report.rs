// src/report.rs
// =============================================================================
// Prints what a run did, either as a short human summary or as JSON.
// =============================================================================

use anyhow::Result;
use serde::Serialize;

use crawler_collage::collage::CollageSummary;
use crawler_collage::images::DownloadReport;

/// Everything worth telling the user after a command finishes.
#[derive(Debug, Default, Serialize)]
pub struct RunReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crawl: Option<CrawlSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download: Option<DownloadReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collage: Option<CollageSummary>,
    /// Why the collage step did not produce a file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collage_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CrawlSummary {
    pub seed_url: String,
    pub pages_visited: usize,
    pub images_found: usize,
    pub still_queued: usize,
}

pub fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print_summary(report);
    }
    Ok(())
}

fn print_summary(report: &RunReport) {
    if let Some(crawl) = &report.crawl {
        println!("🕷️  Crawl from {}", crawl.seed_url);
        println!("   📄 Pages visited: {}", crawl.pages_visited);
        println!("   🖼️  Images found: {}", crawl.images_found);
        println!("   ⏳ Still queued: {}", crawl.still_queued);
    }

    if let Some(download) = &report.download {
        println!("📥 Downloads");
        println!("   ✅ Written: {}", download.written);
        println!("   🔁 Duplicate content: {}", download.duplicates);
        println!("   🤏 Too small / no size: {}", download.too_small);
        println!("   📁 Already on disk: {}", download.skipped_existing);
        println!(
            "   ❌ Failed: {}",
            download.fetch_failed + download.write_failed
        );
    }

    if let Some(collage) = &report.collage {
        println!(
            "🧩 Collage: {} ({}x{}, {} image(s) in {} row(s))",
            collage.output.display(),
            collage.width,
            collage.height,
            collage.images,
            collage.rows
        );
    }
    if let Some(error) = &report.collage_error {
        println!("⚠️  Making collage failed: {error}");
    }
}
