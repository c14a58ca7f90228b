//! End-to-end tests rendering templates through environments built from the
//! catalog.

use std::collections::HashMap;

use minijinja::{context, Environment};
use tmplfuncs::{
    catalog, new_environment, register_filters, register_functions, Engine, FuncMap, ObjectId,
    Request, Timestamp, Value,
};

fn render(template: &str, ctx: Value) -> String {
    new_environment().render_str(template, ctx).unwrap()
}

// ============================================================================
// Helper families
// ============================================================================

#[test]
fn test_string_helpers_render() {
    let out = render(
        "{{ capfirst(word) }}|{{ word | upper }}|{{ 'x' | repeat(3) }}|{{ word | center(9) }}|",
        context! { word => "rust" },
    );
    assert_eq!(out, "Rust|RUST|xxx|  rust   |");
}

#[test]
fn test_number_helpers_render() {
    let out = render(
        concat!(
            "{{ ordinal(11) }} ",
            "{{ ordinal(22) }} ",
            "{{ 4 | apnumber }} ",
            "{{ 1536 | filesizeformat }} ",
            "{{ humanizeSize(82854982) }}",
        ),
        context! {},
    );
    assert_eq!(out, "11th 22nd four 1.5 KB 83 MB");
}

#[test]
fn test_pluralize_in_sentence() {
    let template = "{{ n }} {{ pluralize('apple,apples', n) }}";
    assert_eq!(render(template, context! { n => 1 }), "1 apple");
    assert_eq!(render(template, context! { n => 2 }), "2 apples");
}

#[test]
fn test_default_filter_form() {
    let template = "[{{ value | default('fallback') }}]";
    assert_eq!(render(template, context! { value => "" }), "[fallback]");
    assert_eq!(render(template, context! { value => "x" }), "[x]");
    assert_eq!(render(template, context! { value => 0 }), "[0]");
    assert_eq!(render(template, context! { value => false }), "[fallback]");
}

#[test]
fn test_collection_helpers_render() {
    let out = render(
        concat!(
            "{{ length(items) }} ",
            "{{ first(items) }} ",
            "{{ last(items) }} ",
            "{{ slice(1, 3, items) | join('-') }} ",
            "{{ isChecked(items, 'b') }}",
        ),
        context! { items => vec!["a", "b", "c", "d"] },
    );
    assert_eq!(out, "4 a d b-c checked");
}

#[test]
fn test_func_map_builds_sequences() {
    let out = render("{{ funcMap(1, 'two', 3) | length }}", context! {});
    assert_eq!(out, "3");
}

#[test]
fn test_query_helpers_render() {
    let out = render(
        concat!(
            "{{ getQuery(r, 'q') }}|",
            "{{ setQuery(r, 'page', '2') }}|",
            "{{ delQuery(r, 'q') }}|",
            "{{ parseUrl('/other', r) }}",
        ),
        context! { r => Value::from(Request::new("/search?q=rust+books&page=1")) },
    );
    assert_eq!(
        out,
        "rust books|/search?page=2&q=rust+books|/search?page=1|/other?q=rust+books&page=1"
    );
}

#[test]
fn test_identity_helpers_render() {
    let id = ObjectId::parse_str("507f1f77bcf86cd799439011").unwrap();
    let out = render(
        concat!(
            "{{ objectId(id) }} ",
            "{{ sameobjectid(id, '507f1f77bcf86cd799439011') }} ",
            "{{ existobjectid([id], 'nope') }}",
        ),
        context! { id => Value::from(id) },
    );
    assert_eq!(out, "507f1f77bcf86cd799439011 true false");
}

#[test]
fn test_time_helpers_render() {
    let start = Timestamp::parse_rfc3339("2024-01-02T00:04:00Z").unwrap();
    let stop = Timestamp::parse_rfc3339("2024-01-02T00:04:02.5Z").unwrap();
    let out = render(
        "{{ timeIn(start, '') }}|{{ duration(start, stop) }}|{{ timeago(zero) }}|",
        context! {
            start => Value::from(start),
            stop => Value::from(stop),
            zero => Value::from(Timestamp::zero()),
        },
    );
    assert_eq!(out, "2024-01-02 08:04 +08|2.5||");
}

// ============================================================================
// Escaping
// ============================================================================

#[test]
fn test_trust_markers_skip_autoescape() {
    let mut env = new_environment();
    env.add_template("page.html", "{{ raw }}|{{ asHTML(raw) }}|{{ markdown('*hi*') }}")
        .unwrap();
    let out = env
        .get_template("page.html")
        .unwrap()
        .render(context! { raw => "<b>x</b>" })
        .unwrap();
    assert_eq!(out, "&lt;b&gt;x&lt;&#x2f;b&gt;|<b>x</b>|<p><em>hi</em></p>\n");
}

#[test]
fn test_tojson_escapes_script_breakers() {
    let mut env = new_environment();
    env.add_template("page.html", "<script>var d = {{ tojson(data) }};</script>")
        .unwrap();
    let out = env
        .get_template("page.html")
        .unwrap()
        .render(context! { data => vec!["</script>"] })
        .unwrap();
    assert_eq!(out, r#"<script>var d = ["\u003c/script\u003e"];</script>"#);
}

// ============================================================================
// Fail-soft behavior
// ============================================================================

#[test]
fn test_wrong_kinds_never_abort_rendering() {
    let template = concat!(
        "[{{ intcomma(s) }}][{{ ordinal(s) }}][{{ truncatechars(s, n) }}]",
        "[{{ filesizeformat(s) }}][{{ slice(0, 2, n) }}][{{ timeago(s) }}]",
        "[{{ getQuery(s, 'q') }}][{{ lower(n) }}][{{ length(n) }}][{{ markdown(n) }}]",
        "[{{ humanizeSize(s) }}][{{ istrue(s) }}][{{ minus(s, 1) }}]",
    );
    let out = render(template, context! { s => "text", n => 42 });
    assert_eq!(out, "[][][][][][][][][0][][NA][false][0]");
}

#[test]
fn test_undefined_values_fall_back() {
    let out = render("[{{ upper(missing) }}][{{ wordcount(missing) }}]", context! {});
    assert_eq!(out, "[][0]");
}

#[test]
fn test_every_helper_survives_unexpected_input() {
    let env = new_environment();
    let odd = [
        Value::UNDEFINED,
        Value::from(()),
        Value::from(-7),
        Value::from(i64::MAX),
        Value::from(i64::MIN),
        Value::from(u64::MAX),
        Value::from(f64::NAN),
        Value::from(""),
        Value::from(vec![Value::from(())]),
        Value::from(Timestamp::zero()),
    ];
    for (name, func) in catalog().iter() {
        for value in &odd {
            for arity in 1..=3 {
                let args = vec![value.clone(); arity];
                let state = env.empty_state();
                match func.call(&state, &args) {
                    Ok(_) => {}
                    Err(err) => assert!(
                        matches!(
                            err.kind(),
                            minijinja::ErrorKind::MissingArgument
                                | minijinja::ErrorKind::TooManyArguments
                        ),
                        "{name} failed on {value:?}: {err}"
                    ),
                }
            }
        }
    }
}

// ============================================================================
// Registration into caller-owned environments
// ============================================================================

#[test]
fn test_prefixed_registration_leaves_builtins_alone() {
    let mut funcs = FuncMap::new();
    tmplfuncs::inject_with_prefix(&mut funcs, "h_");
    let mut env = Environment::new();
    register_functions(&mut env, &funcs);
    register_filters(&mut env, &funcs);

    let out = env
        .render_str(
            "{{ name | upper }} {{ name | h_truncatechars(4) }} {{ h_intcomma(1000) }}",
            context! { name => "abcdef" },
        )
        .unwrap();
    assert_eq!(out, "ABCDEF a... 1,000");
}

#[test]
fn test_engine_renders_with_context_objects() {
    let engine = Engine::new();
    let mut context = HashMap::new();
    context.insert("request".to_string(), Value::from(Request::new("/?a=1")));
    let out = engine
        .render_with_context(
            "{{ delQuery(request, 'a') }} {{ count | intcomma }}",
            &serde_json::json!({ "count": 12345 }),
            context,
        )
        .unwrap();
    assert_eq!(out, "/ 12,345");
}
