//! Search orchestration over a scripted page

use profile_scraper::{
    PageTimings, ProfilePipeline, ScrapeError, ScraperConfig, SearchOrchestrator, SearchPhase,
    SearchQuery, SessionManager,
};
use tempfile::TempDir;

mod common;
use common::{
    MemorySessionStore, MockPage, PROFILE_ANCHORS, PROFILE_ANCHORS_LOOSE, profile_html,
    profile_json, test_config,
};

fn query() -> SearchQuery {
    SearchQuery::new().role("Rust Engineer").location("Berlin")
}

fn search_url(config: &ScraperConfig) -> String {
    query().search_url(config.site_url(), false).unwrap()
}

fn profile_url(i: usize) -> String {
    format!("https://www.linkedin.com/in/user-{i}")
}

/// Logged-in page serving a profile document for users `0..n`
fn page_with_profiles(n: usize) -> MockPage {
    (0..n).fold(MockPage::logged_in(), |page, i| {
        page.with_document(&profile_url(i), profile_html(&format!("User {i}")))
    })
}

#[tokio::test]
async fn test_links_differing_by_query_are_processed_once() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::new([profile_json("Jane")]), &config);
    let page = MockPage::logged_in()
        .with_document("https://www.linkedin.com/in/jane", profile_html("Jane"))
        .with_hrefs(
            PROFILE_ANCHORS,
            &[
                "https://www.linkedin.com/in/jane?miniProfileUrn=abc",
                "https://www.linkedin.com/in/jane?trk=people-search",
            ],
        );

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let report = orchestrator.run(&page, &query(), 3).await.unwrap();

    assert_eq!(report.links, vec!["https://www.linkedin.com/in/jane"]);
    assert_eq!(report.profiles.len(), 1);
    assert_eq!(pipeline.extractor().model().calls(), 1);
}

#[tokio::test]
async fn test_max_profiles_bounds_processing_in_first_seen_order() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let responses: Vec<String> = (0..10).map(|i| profile_json(&format!("User {i}"))).collect();
    let pipeline = ProfilePipeline::new(common::StubModel::new(responses), &config);
    let hrefs: Vec<String> = (0..10).map(|i| format!("/in/user-{i}")).collect();
    let href_refs: Vec<&str> = hrefs.iter().map(String::as_str).collect();
    let page = page_with_profiles(10).with_hrefs(PROFILE_ANCHORS, &href_refs);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let report = orchestrator.run(&page, &query(), 3).await.unwrap();

    assert_eq!(
        report.links,
        vec![profile_url(0), profile_url(1), profile_url(2)]
    );
    let names: Vec<&str> = report
        .profiles
        .iter()
        .filter_map(|p| p.full_name())
        .collect();
    assert_eq!(names, vec!["User 0", "User 1", "User 2"]);
    assert_eq!(pipeline.extractor().model().calls(), 3);
    assert!(!page.called(&format!("goto {}", profile_url(3))));
    assert_eq!(report.phase, SearchPhase::Done);
}

#[tokio::test]
async fn test_failed_profile_is_skipped_not_fatal() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(
        common::StubModel::new([profile_json("User 0"), profile_json("User 2")]),
        &config,
    );
    let page = page_with_profiles(3)
        .with_failing_goto(&profile_url(1))
        .with_hrefs(PROFILE_ANCHORS, &["/in/user-0", "/in/user-1", "/in/user-2"]);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let report = orchestrator.run(&page, &query(), 3).await.unwrap();

    let sources: Vec<Option<&str>> = report
        .profiles
        .iter()
        .map(|p| p.linkedin_url.as_deref())
        .collect();
    assert_eq!(
        sources,
        vec![Some(profile_url(0).as_str()), Some(profile_url(2).as_str())]
    );
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, profile_url(1));
    assert_eq!(orchestrator.phase(), SearchPhase::Done);
}

#[tokio::test]
async fn test_extraction_failure_is_recorded_per_profile() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    // Second profile gets prose twice and exhausts the ladder
    let pipeline = ProfilePipeline::new(
        common::StubModel::new([
            profile_json("User 0"),
            "not json".to_string(),
            "still not json".to_string(),
        ]),
        &config,
    );
    let page = page_with_profiles(2).with_hrefs(PROFILE_ANCHORS, &["/in/user-0", "/in/user-1"]);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let report = orchestrator.run(&page, &query(), 3).await.unwrap();

    assert_eq!(report.profiles.len(), 1);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].reason.contains("Extraction failed"));
}

#[tokio::test]
async fn test_auth_wall_aborts_before_link_collection() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::default(), &config);
    let page = MockPage::logged_in()
        .with_redirect(
            &search_url(&config),
            "https://www.linkedin.com/authwall?trk=qf&original_referer=",
        )
        .with_results_visible(false)
        .with_hrefs(PROFILE_ANCHORS, &["/in/user-0"]);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let err = orchestrator.run(&page, &query(), 3).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Authentication(_)));
    assert!(err.to_string().contains("requires login"));
    assert_eq!(orchestrator.phase(), SearchPhase::Aborted);
    assert!(!page.called("attributes"));
    assert_eq!(pipeline.extractor().model().calls(), 0);
}

#[tokio::test]
async fn test_missing_results_container_is_tolerated() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::new([profile_json("User 0")]), &config);
    let page = page_with_profiles(1)
        .with_results_visible(false)
        .with_hrefs(PROFILE_ANCHORS, &["/in/user-0"]);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let report = orchestrator.run(&page, &query(), 3).await.unwrap();

    assert_eq!(report.profiles.len(), 1);
}

#[tokio::test]
async fn test_login_failure_aborts_without_searching() {
    let config = ScraperConfig::builder()
        .llm_api_key("test-key")
        .timings(PageTimings::none())
        .build()
        .unwrap();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::default(), &config);
    let page = MockPage::new();

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let err = orchestrator.run(&page, &query(), 3).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Configuration(_)));
    assert_eq!(orchestrator.phase(), SearchPhase::Aborted);
    assert!(!page.called("goto https://www.linkedin.com/search"));
}

#[tokio::test]
async fn test_search_navigation_failure_aborts() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::default(), &config);
    let page = MockPage::logged_in().with_failing_goto(&search_url(&config));

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let err = orchestrator.run(&page, &query(), 3).await.unwrap_err();

    assert!(matches!(err, ScrapeError::Navigation(_)));
    assert_eq!(orchestrator.phase(), SearchPhase::Aborted);
}

#[tokio::test]
async fn test_loose_selector_used_when_primary_finds_nothing() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::new([profile_json("User 0")]), &config);
    let page = page_with_profiles(1).with_hrefs(PROFILE_ANCHORS_LOOSE, &["/in/user-0?mini=1"]);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let report = orchestrator.run(&page, &query(), 3).await.unwrap();

    assert!(page.called(&format!("attributes {PROFILE_ANCHORS} href")));
    assert!(page.called(&format!("attributes {PROFILE_ANCHORS_LOOSE} href")));
    assert_eq!(report.links, vec![profile_url(0)]);
}

#[tokio::test]
async fn test_no_anchors_dumps_search_page() {
    let dir = TempDir::new().unwrap();
    let config = ScraperConfig::builder()
        .llm_api_key("test-key")
        .credentials("jane@x.com", "secret")
        .timings(PageTimings::none())
        .debug_dump_dir(dir.path())
        .build()
        .unwrap();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::default(), &config);
    let page = MockPage::logged_in().with_document(
        &search_url(&config),
        "<html><body>No results found</body></html>",
    );

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let report = orchestrator.run(&page, &query(), 3).await.unwrap();

    assert!(report.links.is_empty());
    assert!(report.profiles.is_empty());
    assert_eq!(report.phase, SearchPhase::Done);
    let dumped = std::fs::read_to_string(dir.path().join("search_page_debug.html")).unwrap();
    assert!(dumped.contains("No results found"));
}

#[tokio::test]
async fn test_search_url_carries_keywords() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::default(), &config);
    let page = MockPage::logged_in();

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    orchestrator
        .run(&page, &query().experience("Senior"), 3)
        .await
        .unwrap();

    assert!(page.called(
        "goto https://www.linkedin.com/search/results/people/?keywords=Rust+Engineer+Berlin&origin=GLOBAL_SEARCH_HEADER"
    ));
}

#[tokio::test]
async fn test_orchestrator_can_run_again_after_finishing() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(
        common::StubModel::new([profile_json("User 0"), profile_json("User 0")]),
        &config,
    );
    let page = page_with_profiles(1).with_hrefs(PROFILE_ANCHORS, &["/in/user-0"]);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    let first = orchestrator.run(&page, &query(), 3).await.unwrap();
    let second = orchestrator.run(&page, &query(), 3).await.unwrap();

    assert_eq!(first.phase, SearchPhase::Done);
    assert_eq!(second.phase, SearchPhase::Done);
    assert_eq!(second.profiles.len(), 1);
    assert_eq!(pipeline.extractor().model().calls(), 2);
}

#[tokio::test]
async fn test_aborted_run_can_be_retried() {
    let config = test_config();
    let sessions = SessionManager::new(MemorySessionStore::default(), &config);
    let pipeline = ProfilePipeline::new(common::StubModel::new([profile_json("User 0")]), &config);
    let failing = MockPage::logged_in().with_failing_goto(&search_url(&config));
    let working = page_with_profiles(1).with_hrefs(PROFILE_ANCHORS, &["/in/user-0"]);

    let mut orchestrator = SearchOrchestrator::new(&sessions, &pipeline, &config);
    assert!(orchestrator.run(&failing, &query(), 3).await.is_err());
    assert_eq!(orchestrator.phase(), SearchPhase::Aborted);

    let report = orchestrator.run(&working, &query(), 3).await.unwrap();
    assert_eq!(report.phase, SearchPhase::Done);
}
