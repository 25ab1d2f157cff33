use axum::response::Html;
use rust_embed::RustEmbed;
use tera::{Context, Tera};

use super::WebError;

#[derive(RustEmbed)]
#[folder = "templates/"]
struct TemplateFiles;

/// Tera instance loaded from the templates compiled into the binary.
pub struct Templates {
    tera: Tera,
}

impl Templates {
    pub fn load() -> anyhow::Result<Self> {
        let mut sources = Vec::new();
        for name in TemplateFiles::iter() {
            let Some(file) = TemplateFiles::get(&name) else {
                continue;
            };
            let body = String::from_utf8(file.data.into_owned())
                .map_err(|e| anyhow::anyhow!("Template {name} is not UTF-8: {e}"))?;
            sources.push((name.into_owned(), body));
        }

        let mut tera = Tera::default();
        tera.add_raw_templates(sources)
            .map_err(|e| anyhow::anyhow!("Failed to parse templates: {e}"))?;

        tracing::debug!("Loaded {} templates", tera.get_template_names().count());
        Ok(Self { tera })
    }

    pub fn render(&self, name: &str, context: &Context) -> Result<Html<String>, WebError> {
        Ok(Html(self.tera.render(name, context)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_templates_parse() {
        let templates = Templates::load().expect("templates should parse");
        let names: Vec<&str> = templates.tera.get_template_names().collect();
        assert!(names.contains(&"base.html"));
        assert!(names.contains(&"partials/film-list.html"));
    }

    #[test]
    fn username_check_fragment() {
        let templates = Templates::load().expect("templates should parse");

        let mut ctx = Context::new();
        ctx.insert("taken", &true);
        let Html(body) = templates
            .render("partials/username-check.html", &ctx)
            .expect("render");
        assert!(body.contains("This username already exists"));
        assert!(body.contains("error"));

        ctx.insert("taken", &false);
        let Html(body) = templates
            .render("partials/username-check.html", &ctx)
            .expect("render");
        assert!(body.contains("This username is available"));
        assert!(body.contains("success"));
    }
}
