//! Built-in HTML page template for the generated documentation site.
//!
//! Keeping the template here, rather than in a file next to the binary,
//! means `doctrainer` works from any directory. Callers can override it via
//! [`crate::config::ProcessConfig::template`]; this constant is used only when
//! no override is provided.
//!
//! Context available to templates:
//!
//! | Name       | Type                                        |
//! |------------|---------------------------------------------|
//! | `title`    | string                                      |
//! | `sections` | list of `{id, level, heading, content, images}` |
//! | `nav`      | list of `{id, heading, level}`              |
//!
//! The `format_content` filter turns section content into escaped `<p>`
//! paragraphs. The inline script filters the sidebar against
//! `search-index.json`, falling back to heading text when the index cannot be
//! fetched (e.g. a page opened from `file://`).

/// Default single-page layout: sidebar navigation plus every section.
pub const DEFAULT_PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ title }}</title>
  <style>
    body { margin: 0; display: flex; font-family: system-ui, sans-serif; line-height: 1.55; }
    nav { width: 18rem; height: 100vh; overflow-y: auto; position: sticky; top: 0; padding: 1rem; border-right: 1px solid #ddd; box-sizing: border-box; }
    nav ul { list-style: none; padding: 0; margin: 0; }
    nav li { margin: 0.2rem 0; }
    {% for depth in range(2, 7) %}nav .level-{{ depth }} { padding-left: {{ depth - 1 }}rem; }
    {% endfor %}
    main { flex: 1; max-width: 52rem; padding: 1rem 2rem; }
    section img { max-width: 100%; }
    #search { width: 100%; margin-bottom: 1rem; }
  </style>
</head>
<body>
  <nav>
    <input id="search" type="search" placeholder="Search…">
    <ul>
    {% for item in nav %}
      <li class="level-{{ item.level }}" data-id="{{ item.id }}"><a href="#{{ item.id }}">{{ item.heading }}</a></li>
    {% endfor %}
    </ul>
  </nav>
  <main>
    <h1>{{ title }}</h1>
    {% for section in sections %}
    <section id="{{ section.id }}">
      <h{{ section.level + 1 if section.level < 6 else 6 }}>{{ section.heading }}</h{{ section.level + 1 if section.level < 6 else 6 }}>
      {{ section.content | format_content }}
      {% for image in section.images %}
      <img src="images/{{ image }}" alt="{{ section.heading }}" loading="lazy">
      {% endfor %}
    </section>
    {% endfor %}
  </main>
  <script>
    (function () {
      var input = document.getElementById("search");
      var items = [];
      fetch("search-index.json")
        .then(function (r) { return r.json(); })
        .then(function (index) { items = index.items || []; })
        .catch(function () { items = []; });
      input.addEventListener("input", function () {
        var q = input.value.trim().toLowerCase();
        var hits = {};
        items.forEach(function (item) {
          var text = (item.heading + " " + item.content).toLowerCase();
          if (text.indexOf(q) !== -1) { hits[item.id] = true; }
        });
        document.querySelectorAll("nav li[data-id]").forEach(function (li) {
          var match = q === "" || hits[li.dataset.id] || li.textContent.toLowerCase().indexOf(q) !== -1;
          li.hidden = !match;
        });
      });
    })();
  </script>
</body>
</html>
"##;
