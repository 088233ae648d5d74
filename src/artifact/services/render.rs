//! Markdown rendering of artifact snapshots.

use crate::artifact::domain::ArtifactSnapshot;
use minijinja::Environment;

const MARKDOWN_TEMPLATE: &str = r"# {{ title }}

- Category: {{ category }}
- Kind: {{ kind }}
- Version: {{ version }}
- Updated: {{ updatedAt }}
{% if notes %}
> {{ notes }}
{% endif %}

{% if format == 'plantuml' %}
```plantuml
{{ content }}
```
{% else %}
{{ content }}
{% endif %}";

/// Renders a snapshot as a standalone markdown document.
///
/// Diagram sources are fenced as `plantuml` code blocks; other content is
/// inserted verbatim.
///
/// # Errors
///
/// Returns the template engine's error when rendering fails.
pub fn render_markdown(snapshot: &ArtifactSnapshot) -> Result<String, minijinja::Error> {
    let mut environment = Environment::new();
    environment.set_trim_blocks(true);
    environment.render_str(MARKDOWN_TEMPLATE, snapshot)
}
