//! Terminal output for one-shot commands.

use review_lens::models::{AnalysisResult, NewBlogPost};
use review_lens::{AnalyzeOutcome, AppError, SearchOutcome};

const WIDTH: usize = 80;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

fn print_section(heading: &str, body: &str) {
    println!("{heading}");
    println!("{}", "-".repeat(heading.chars().count()));
    println!("{}", textwrap::fill(body, WIDTH));
    println!();
}

pub fn print_search(outcome: &SearchOutcome) {
    println!(
        "Stored {} posts for '{}' (from hit {} of {})",
        outcome.stored, outcome.product_name, outcome.start, outcome.total
    );
    println!();
    print_posts(&outcome.posts);
}

/// Print posts as a table.
pub fn print_posts(posts: &[NewBlogPost]) {
    if posts.is_empty() {
        println!("No posts cached.");
        return;
    }

    println!("{:<10} {:<16} {:<50}", "Date", "Blogger", "Title");
    println!("{}", "-".repeat(WIDTH));

    for post in posts {
        println!(
            "{:<10} {:<16} {:<50}",
            post.post_date,
            truncate(&post.blogger_name, 16),
            truncate(&post.title, 50)
        );
    }
}

pub fn print_analysis(outcome: &AnalyzeOutcome) {
    match outcome {
        AnalyzeOutcome::Cached(result) => {
            println!("Cached analysis (run with --reanalyze to refresh)");
            println!();
            print_result(result);
        }
        AnalyzeOutcome::Fresh {
            result,
            ad_analysis,
            truncated,
        } => {
            if *truncated {
                println!("warning: review text was too long, only the beginning was analysed");
                println!();
            }
            print_section("Promotional content", ad_analysis);
            print_result(result);
        }
    }
}

pub fn print_result(result: &AnalysisResult) {
    println!();
    print_section("Positive opinions", &result.positive_opinions);
    print_section("Negative opinions", &result.negative_opinions);
    print_section("Overall summary", &result.summary);
    println!("Analysed {}", result.created_at.format("%Y-%m-%d %H:%M UTC"));
}

pub fn print_warning(err: &AppError) {
    eprintln!("warning: {err}");
}

/// Shown when the model's reply could not be used, for diagnosis.
pub fn print_raw_reply(raw: &str) {
    eprintln!("Raw reply from the model:");
    eprintln!("{raw}");
    eprintln!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("short", 16), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("가나다라마바", 4), "가나다…");
    }
}
