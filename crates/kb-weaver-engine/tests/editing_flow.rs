//! End-to-end flows across the codec, the form assembler and the editor
//! synchronization: the paths a document actually travels between the
//! structured form, the editor surface and the save boundary.

use std::time::{Duration, Instant};

use kb_weaver_engine::codec::{compose_markdown, parse_markdown};
use kb_weaver_engine::compose::{FieldEdit, FormAssembler};
use kb_weaver_engine::models::{Article, SupportTicket, TicketComment};
use kb_weaver_engine::sync::{EditorOptions, EditorSurface, EditorSync};
use kb_weaver_engine::{import, quality, scan};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct TestSurface {
    text: String,
    replace_count: usize,
}

impl EditorSurface for TestSurface {
    fn content(&self) -> String {
        self.text.clone()
    }

    fn replace_all(&mut self, text: &str) {
        self.text = text.to_string();
        self.replace_count += 1;
    }
}

fn sample_article() -> Article {
    Article {
        title: "Reset a stuck print queue".to_string(),
        problem: "Print jobs pile up and nothing reaches the printer.".to_string(),
        solution: "1. Stop the spooler service\n2. Delete queued jobs\n3. Start the spooler again"
            .to_string(),
        expected_result: Some("New jobs print within seconds.".to_string()),
        prerequisites: Some("Local admin rights".to_string()),
        additional_notes: None,
        tags: vec!["printing".to_string()],
        ..Article::default()
    }
}

#[test]
fn canonical_serializations_round_trip_their_field_values() {
    let article = sample_article();
    let parsed = parse_markdown(&compose_markdown(&article));

    assert_eq!(parsed.title, article.title);
    assert_eq!(parsed.problem, article.problem);
    assert_eq!(parsed.solution, article.solution);
    assert_eq!(Some(parsed.expected_result), article.expected_result);
    assert_eq!(Some(parsed.prerequisites), article.prerequisites);
    assert_eq!(parsed.additional_notes, "");
}

#[test]
fn serialize_after_parse_is_not_identity() {
    // Alias spelling, an unrecognized section and loose whitespace all survive
    // parsing but are normalized away by serialization.
    let md = "# Title\n\n\n## Resolution\nRestart it.\n\n## Internal Only\nnot for the wiki\n\n## Problem   \nIt broke.";

    let parsed = parse_markdown(md);
    let recomposed = compose_markdown(&parsed.clone().into_article(md.to_string()));

    assert_ne!(recomposed, md);
    assert!(recomposed.contains("## Solution\nRestart it."));
    assert!(!recomposed.contains("Internal Only"));

    // The normalization is stable: parsing the recomposition changes nothing.
    let reparsed = parse_markdown(&recomposed);
    assert_eq!(reparsed, parsed);
}

#[test]
fn form_edits_reach_the_editor_exactly_once() {
    let mut form = FormAssembler::new(Article::default());
    let mut editor = EditorSync::new(TestSurface::default(), EditorOptions::default(), "");
    let now = Instant::now();

    let md = form.apply(FieldEdit::Title("Stuck queue".to_string()), now).to_string();
    assert!(editor.set_external(&md));

    // Republishing the identical document must not touch the surface again.
    assert!(!editor.set_external(&md));
    assert_eq!(editor.surface().replace_count, 2); // seed + one genuine change
}

#[test]
fn a_local_edit_echoed_back_never_rewrites_the_surface() {
    let mut editor = EditorSync::new(TestSurface::default(), EditorOptions::default(), "# Draft");

    editor.surface_mut().text = "# Draft\n\nnew paragraph".to_string();
    let markdown = editor.local_edit();

    // The owner adopts the value and, as producers do, supplies it right back.
    let replaced = editor.set_external(&markdown);
    assert!(!replaced);
    assert_eq!(editor.surface().replace_count, 1); // the seed only
}

#[test]
fn ticket_import_seeds_editor_and_survives_the_save_boundary() {
    let ticket = SupportTicket {
        key: "HELP-99".to_string(),
        summary: "Wifi drops in meeting rooms".to_string(),
        description: Some("Clients disconnect when roaming between APs.".to_string()),
        status: "Resolved".to_string(),
        priority: None,
        resolution: Some("Fixed".to_string()),
        labels: vec!["wifi".to_string(), "roaming".to_string()],
        components: vec![],
        comments: vec![TicketComment {
            author: "netops".to_string(),
            body: "Enabled 802.11r fast transition on the controller.".to_string(),
            created: "2024-05-02T09:00:00Z".to_string(),
        }],
        created: "2024-05-01T12:00:00Z".to_string(),
        updated: "2024-05-02T09:30:00Z".to_string(),
    };

    let seed = import::ticket_to_markdown(&ticket);
    let mut editor = EditorSync::new(TestSurface::default(), EditorOptions::default(), &seed);

    // The engineer appends a note directly in the editor.
    editor.surface_mut().text.push_str("\n\n## Additional Notes\nRolled out to all sites.");
    let markdown = editor.local_edit();

    let article = parse_markdown(&markdown).into_article(markdown.clone());
    assert!(article.validate().is_ok());
    assert_eq!(article.title, "Wifi drops in meeting rooms");
    assert_eq!(article.tags, vec!["wifi", "roaming"]);
    assert_eq!(
        article.additional_notes.as_deref(),
        Some("Rolled out to all sites.")
    );
    assert!(scan::scan(&markdown).is_empty());
}

#[test]
fn debounced_scoring_runs_against_the_settled_form() {
    let mut form = FormAssembler::new(sample_article());
    let t0 = Instant::now();

    form.apply(FieldEdit::Problem("Print jobs pile up and block everyone.".to_string()), t0);
    form.apply(
        FieldEdit::ExpectedResult("Queue drains on its own.".to_string()),
        t0 + Duration::from_millis(300),
    );

    assert!(form.poll(t0 + Duration::from_millis(600)).is_none());
    let request = form.poll(t0 + Duration::from_millis(800)).unwrap();

    let score = quality::score(&request.article);
    assert!(form.apply_score(request.seq, score));

    let applied = form.score().unwrap();
    assert!(applied.has_solution);
    assert_eq!(applied.solution_step_count, 3);
}

#[test]
fn scanning_a_leaky_article_flags_before_publication() {
    let mut article = sample_article();
    article.solution = "1. SSH to 10.1.4.22\n2. password: hunter2hunter2\n3. restart".to_string();
    let markdown = compose_markdown(&article);

    let flags = scan::scan(&markdown);
    let kinds: Vec<&str> = flags.iter().map(|f| f.pattern_type.as_str()).collect();
    assert!(kinds.contains(&"internal_ip"));
    assert!(kinds.contains(&"credentials"));
}
