//! Integration tests for template resolution and rendering.

use std::path::Path;

use binjar_preamble::{
    PreambleError, RenderContext, RuntimeOptions, Template, TemplateChoice, render,
    resolve_template,
};

fn render_choice(choice: &TemplateChoice<'_>, options: &RuntimeOptions) -> Vec<u8> {
    let template = resolve_template(choice).unwrap();
    render(
        &template,
        &RenderContext {
            name: "hello",
            version: "0.3.1",
            main: "hello.core",
            options,
        },
    )
    .into_bytes()
}

#[test]
fn test_default_preamble() {
    let out = render_choice(&TemplateChoice::default(), &RuntimeOptions::default());
    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            ":;exec java -XX:+TieredCompilation -XX:TieredStopAtLevel=1 -jar \"$0\" \"$@\"\n",
            "@echo off\r\n",
            "java -XX:+TieredCompilation -XX:TieredStopAtLevel=1 -jar \"%~f0\" %*\r\n",
            "goto :eof\r\n",
        )
    );
}

#[test]
fn test_bootclasspath_preamble() {
    let choice = TemplateChoice {
        use_bootstrap_classpath: true,
        ..TemplateChoice::default()
    };
    let options = RuntimeOptions::new(["-Xmx512m", "-Dlog.dir=$LOG_DIR"]);
    let out = render_choice(&choice, &options);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        concat!(
            ":;exec java -Xmx512m -Dlog.dir=$LOG_DIR -Xbootclasspath/a:\"$0\" hello.core \"$@\"\n",
            "@echo off\r\n",
            "java -Xmx512m -Dlog.dir=%LOG_DIR% -Xbootclasspath/a:\"%~f0\" hello.core %*\r\n",
            "goto :eof\r\n",
        )
    );
}

#[test]
fn test_inline_preamble() {
    let choice = TemplateChoice {
        inline_text: Some(
            "#!/bin/sh\n# {{name}} {{version}}\nexec java {{jvm_opts}} -cp \"$0\" {{main}} \\$APP_ARGS \"$@\"\n",
        ),
        use_bootstrap_classpath: true,
        ..TemplateChoice::default()
    };
    let out = render_choice(&choice, &RuntimeOptions::default());
    insta::assert_snapshot!(String::from_utf8(out).unwrap(), @r#"
    #!/bin/sh
    # hello 0.3.1
    exec java -XX:+TieredCompilation -XX:TieredStopAtLevel=1 -cp "$0" hello.core $APP_ARGS "$@"
    "#);
}

#[test]
fn test_script_file_is_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("launch.sh");
    let raw = b"#!/bin/sh\nexec java -jar \"$0\" {{main}} \\$X\n".to_vec();
    std::fs::write(&script, &raw).unwrap();

    let choice = TemplateChoice {
        script_path: Some(script.as_path()),
        inline_text: Some("ignored"),
        use_bootstrap_classpath: true,
    };
    assert_eq!(resolve_template(&choice).unwrap(), Template::Verbatim(raw.clone()));
    assert_eq!(render_choice(&choice, &RuntimeOptions::default()), raw);
}

#[test]
fn test_missing_script_file() {
    let choice = TemplateChoice {
        script_path: Some(Path::new("/nonexistent/launch.sh")),
        ..TemplateChoice::default()
    };
    let err = resolve_template(&choice).unwrap_err();
    match err {
        PreambleError::MissingFile { path } => {
            assert_eq!(path, Path::new("/nonexistent/launch.sh"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let options = RuntimeOptions::new(["-Da=$A"]);
    let choice = TemplateChoice::default();
    let first = render_choice(&choice, &options);
    let second = render_choice(&choice, &options);
    assert_eq!(first, second);
}
