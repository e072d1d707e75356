use whisker::{Attrs, Pragma, Value};

fn main() -> whisker::Result<()> {
    let mut engine = whisker::Engine::new();
    engine.enable_pragma(Pragma::Attributes);
    engine.enable_pragma(Pragma::Filters);
    engine.add_filter("upper", |s: String| s.to_uppercase());

    // Partials can be parameterized using attributes
    engine.add_template("button", r#"<button class="{{ class }}">{{ label }}</button>"#)?;

    // A lambda receives the attributes of the tag it is called from
    let link = Value::lambda(|attrs: &Attrs| {
        format!(
            r#"<a href="{}">{}</a>"#,
            attrs.get_str("href").unwrap_or("#"),
            attrs.get_str("text").unwrap_or_default(),
        )
    });

    // A section lambda can render its body with its attributes in scope
    let card = Value::section_lambda(|text, helper, attrs| {
        Ok(format!("<div class=\"card\">{}</div>", helper.render_with(text, attrs.clone())?))
    });

    let data = Value::from([
        ("user", Value::from([("name", "John Smith")])),
        ("link", link),
        ("card", card),
    ]);

    let out = engine
        .compile(
            r#"
{{# card title=user.name }}
<h2>{{ title | upper }}</h2>
{{> button class="primary" label="Save" }}
{{{ link href="/home" text="Home" }}}
{{/ card }}
"#,
        )?
        .render_from(&data)
        .to_string()?;

    println!("{out}");

    Ok(())
}
