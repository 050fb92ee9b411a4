#![allow(clippy::expect_used)]

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt as _;

use strategist::consumer::StreamConsumer;
use strategist::display::renderer::Renderer;
use strategist::replay::{ReplayTransport, TestCase, parse_header};
use strategist::session::state::ResultState;

const CASES: &[&str] = &["streamed_plan", "guardrail", "unicode_crlf", "revised_plan"];

fn load_case(name: &str) -> (TestCase, Vec<u8>) {
    let base = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/cases");
    let case: TestCase = toml::from_str(
        &std::fs::read_to_string(base.join(format!("{name}.toml")))
            .expect("Failed to read TOML file"),
    )
    .expect("Failed to parse TOML file");
    let recording = std::fs::read(base.join(format!("{name}.sse"))).expect("Failed to read SSE file");
    (case, recording)
}

/// The recording's header must name the same request as the case file.
fn validate_recording(case: &TestCase, recording: &[u8]) {
    let text = std::str::from_utf8(recording).expect("Recording should be valid UTF-8");
    let header = text.lines().next().expect("Recording should not be empty");
    let recorded = parse_header(header).expect("First line should be a replay header");
    assert_eq!(recorded, case.request(), "Recording header request mismatch");
}

/// Replay a recording through the consumer in `chunk_size` pieces.
async fn replay(case: &TestCase, recording: &[u8], chunk_size: usize) -> Vec<ResultState> {
    let transport = Arc::new(ReplayTransport::new(recording.to_vec(), chunk_size));
    let consumer = StreamConsumer::new(transport);
    consumer.submit(case.request()).collect().await
}

fn render(case: &TestCase, states: &[ResultState]) -> String {
    let mut output = Vec::new();
    let mut renderer = Renderer::with_writer(&mut output);
    renderer.render_header(&case.request());
    for state in states {
        renderer.render(state);
    }
    drop(renderer);
    String::from_utf8(output).expect("Output should be valid UTF-8")
}

/// Strip ANSI escape codes for readable snapshots.
fn strip_ansi(s: &str) -> String {
    let mut result = String::new();
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\x1b' {
            while let Some(&next) = chars.peek() {
                chars.next();
                if next.is_ascii_alphabetic() {
                    break;
                }
            }
        } else {
            result.push(c);
        }
    }
    result
}

macro_rules! replay_test {
    ($name:ident) => {
        #[tokio::test(start_paused = true)]
        async fn $name() {
            let (case, recording) = load_case(stringify!($name));
            validate_recording(&case, &recording);

            let states = replay(&case, &recording, case.chunk_size).await;
            let terminal = states.iter().filter(|s| s.is_terminal()).count();
            assert_eq!(terminal, 1, "Expected exactly one terminal snapshot");
            assert!(
                states.last().is_some_and(ResultState::is_terminal),
                "Terminal snapshot should be last"
            );

            let clean = strip_ansi(&render(&case, &states));

            insta::with_settings!({
                snapshot_path => "../tests/cases",
                prepend_module_to_snapshot => false,
            }, {
                insta::assert_snapshot!(stringify!($name), clean);
            });
        }
    };
}

replay_test!(streamed_plan);
replay_test!(guardrail);
replay_test!(unicode_crlf);
replay_test!(revised_plan);

/// Splitting the body differently must not change what the consumer emits.
#[tokio::test(start_paused = true)]
async fn chunk_size_does_not_change_snapshots() {
    for name in CASES {
        let (case, recording) = load_case(name);
        let whole = replay(&case, &recording, recording.len()).await;
        for chunk_size in [1, 2, 3, 7, 64] {
            let split = replay(&case, &recording, chunk_size).await;
            assert_eq!(split, whole, "{name}: chunk size {chunk_size} diverged");
        }
    }
}

/// The placeholder always comes first and is never terminal.
#[tokio::test(start_paused = true)]
async fn placeholder_leads_every_replay() {
    for name in CASES {
        let (case, recording) = load_case(name);
        let states = replay(&case, &recording, case.chunk_size).await;
        assert_eq!(states.first(), Some(&ResultState::streaming()), "{name}");
    }
}
