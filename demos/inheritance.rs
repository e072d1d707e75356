fn main() -> whisker::Result<()> {
    let mut engine = whisker::Engine::new();
    engine.enable_pragma(whisker::Pragma::Blocks);

    engine.add_template(
        "layouts/base",
        r#"<html>
<head><title>{{$ title }}My Site{{/ title }}</title></head>
<body>
  {{$ content }}
  Nothing to see here.
  {{/ content }}
</body>
</html>
"#,
    )?;

    engine.add_template(
        "layouts/page",
        r#"{{< layouts/base }}
{{$ content }}
<main>
  {{$ body }}{{/ body }}
</main>
{{/ content }}
{{/ layouts/base }}
"#,
    )?;

    let out = engine
        .compile(
            r#"{{< layouts/page }}
{{$ title }}{{ title }} | My Site{{/ title }}
{{$ body }}<p>Hello {{ user.name }}!</p>{{/ body }}
{{/ layouts/page }}
"#,
        )?
        .render(serde_json::json!({
            "title": "Welcome",
            "user": { "name": "John Smith" },
        }))
        .to_string()?;

    println!("{out}");

    Ok(())
}
