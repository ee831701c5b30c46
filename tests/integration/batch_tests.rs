//! End-to-end batches against a wiremock site
//!
//! The batch runner is synchronous and builds a blocking HTTP client, so the
//! tests drive it from the plain test thread while [`MockSite`] serves pages
//! from its own runtime.

use crate::support::MockSite;
use link_harvest::config::Config;
use link_harvest::job::SkipReason;
use link_harvest::runner::create_run_dir;
use link_harvest::{BatchRunner, ErrorKind, ExtractionError, Outcome, Strategy};
use std::path::Path;
use tempfile::TempDir;

/// Seed page with three good links (one relative), a 404 and a linkless block
fn standard_site() -> MockSite {
    let site = MockSite::start();
    let base = site.uri();

    site.page(
        "/item",
        200,
        &format!(
            r#"<html><body><table>
            <tr><td><span class="commtext">see <a href="{base}/articles/one">one</a></span></td></tr>
            <tr><td><span class="commtext">no links in this comment</span></td></tr>
            <tr><td><span class="commtext"><a href="{base}/articles/two">two</a> and
                <a href="{base}/articles/ignored">second link</a></span></td></tr>
            <tr><td><span class="commtext"><a href="/articles/three">three</a></span></td></tr>
            <tr><td><span class="commtext"><a href="{base}/missing">gone</a></span></td></tr>
            </table></body></html>"#,
            base = base
        ),
    );
    site.page("/articles/one", 200, "<html>one</html>");
    site.page("/articles/two", 200, "<html>two</html>");
    site.page("/articles/three", 200, "<html>three</html>");
    site.page("/articles/ignored", 200, "<html>ignored</html>");
    site.page("/missing", 404, "not found");

    site
}

fn test_config() -> Config {
    let mut config = Config::default();
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config.http.user_agent = "link-harvest-tests/1.0".to_string();
    config.batch.pool_size = 3;
    config
}

fn saved_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read output dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn test_every_strategy_harvests_the_site() {
    let site = standard_site();
    let seed = format!("{}/item", site.uri());
    let runner = BatchRunner::from_config(&test_config()).expect("Failed to build runner");

    for strategy in Strategy::ALL {
        let output = TempDir::new().unwrap();
        let result = runner
            .harvest(&seed, output.path(), strategy)
            .expect("Seed page should load");

        let counts = result.counts();
        assert_eq!(result.total_jobs, 5, "{}", strategy);
        assert_eq!(result.outcomes.len(), 5, "{}", strategy);
        assert_eq!(counts.success, 3, "{}", strategy);
        assert_eq!(counts.skipped, 1, "{}", strategy);
        assert_eq!(counts.failed, 1, "{}", strategy);

        let files = saved_files(output.path());
        assert_eq!(files.len(), 3, "{}: {:?}", strategy, files);
        assert!(files.iter().all(|f| f.ends_with(".html")));
        assert!(files.iter().any(|f| f.ends_with("-articles-three.html")));
        assert!(!files.iter().any(|f| f.contains("ignored")));

        let missing = result
            .outcomes
            .iter()
            .find(|o| o.is_failed())
            .expect("404 should fail");
        match missing {
            Outcome::Failed {
                error_kind,
                message,
                ..
            } => {
                assert_eq!(*error_kind, ErrorKind::Network);
                assert!(message.contains("/missing"), "{}", message);
                assert!(message.contains("404"), "{}", message);
            }
            _ => unreachable!(),
        }
    }
}

#[test]
fn test_saved_content_matches_response_body() {
    let site = standard_site();
    let seed = format!("{}/item", site.uri());
    let runner = BatchRunner::from_config(&test_config()).unwrap();
    let output = TempDir::new().unwrap();

    let result = runner
        .harvest(&seed, output.path(), Strategy::AsyncPipelined)
        .unwrap();
    let expected = "<html>one</html>".len() * 2 + "<html>three</html>".len();
    assert_eq!(result.bytes_written(), expected as u64);

    let one = output
        .path()
        .join(format!("{}-articles-one.html", site.uri().trim_start_matches("http://")));
    assert_eq!(std::fs::read_to_string(one).unwrap(), "<html>one</html>");
}

#[test]
fn test_rerunning_a_batch_is_idempotent() {
    let site = standard_site();
    let seed = format!("{}/item", site.uri());
    let runner = BatchRunner::from_config(&test_config()).unwrap();
    let root = TempDir::new().unwrap();
    let output = create_run_dir(root.path(), &chrono::Local::now()).unwrap();

    let job_set = runner.load_jobs(&seed, &output).unwrap();
    let first = runner.run(&job_set, Strategy::BoundedPool);
    let files_after_first = saved_files(&output);

    let second = runner.run(&job_set, Strategy::AsyncTwoStage);
    let files_after_second = saved_files(&output);

    assert_eq!(first.counts(), second.counts());
    assert_eq!(files_after_first, files_after_second);
    assert_eq!(files_after_second.len(), 3);
}

#[test]
fn test_duplicate_links_are_skipped_as_collisions() {
    let site = MockSite::start();
    let base = site.uri();
    site.page(
        "/item",
        200,
        &format!(
            r#"<span class="commtext"><a href="{base}/dup">a</a></span>
               <span class="commtext"><a href="{base}/dup">again</a></span>"#,
            base = base
        ),
    );
    site.page("/dup", 200, "dup");

    let runner = BatchRunner::from_config(&test_config()).unwrap();
    let output = TempDir::new().unwrap();
    let result = runner
        .harvest(&format!("{}/item", base), output.path(), Strategy::ThreadPerJob)
        .unwrap();

    assert_eq!(result.counts().success, 1);
    assert_eq!(result.counts().skipped, 1);
    assert!(result.outcomes.iter().any(|o| matches!(
        o,
        Outcome::Skipped {
            reason: SkipReason::Collision { .. },
            ..
        }
    )));
    assert_eq!(saved_files(output.path()).len(), 1);
}

#[test]
fn test_unavailable_seed_page_aborts_before_any_job() {
    let site = MockSite::start();
    site.page("/item", 500, "boom");

    let runner = BatchRunner::from_config(&test_config()).unwrap();
    let output = TempDir::new().unwrap();
    let seed = format!("{}/item", site.uri());
    let result = runner.harvest(&seed, output.path(), Strategy::BoundedPool);

    assert!(matches!(result, Err(ExtractionError::SeedFetch { .. })));
    assert!(saved_files(output.path()).is_empty());
}

#[test]
fn test_seed_page_without_blocks_gives_empty_batch() {
    let site = MockSite::start();
    site.page("/item", 200, "<html><body><p>quiet thread</p></body></html>");

    let runner = BatchRunner::from_config(&test_config()).unwrap();
    let output = TempDir::new().unwrap();

    for strategy in Strategy::ALL {
        let result = runner
            .harvest(&format!("{}/item", site.uri()), output.path(), strategy)
            .unwrap();
        assert_eq!(result.total_jobs, 0, "{}", strategy);
        assert!(result.outcomes.is_empty(), "{}", strategy);
    }
}

#[test]
fn test_result_serializes_to_json() {
    let site = standard_site();
    let runner = BatchRunner::from_config(&test_config()).unwrap();
    let output = TempDir::new().unwrap();

    let result = runner
        .harvest(&format!("{}/item", site.uri()), output.path(), Strategy::Sequential)
        .unwrap();
    let json: serde_json::Value = serde_json::from_str(&result.to_json().unwrap()).unwrap();

    assert_eq!(json["strategy"], "sequential");
    assert_eq!(json["total_jobs"], 5);
    assert_eq!(json["outcomes"].as_array().unwrap().len(), 5);
    assert!(json["duration_secs"].as_f64().unwrap() >= 0.0);
}
