//! The resolution rule cascade.
//!
//! Rules run top to bottom; the first one returning `Some` decides the
//! request. Every matcher is a pure predicate over the normalized path
//! plus bounded existence checks, so each rule is testable on its own.

use super::{Resolution, Resolver, Route};
use crate::index::INDEX_FILE;

pub(crate) type Rule = fn(&Resolver, &Route) -> Option<Resolution>;

/// The cascade, with the name each rule reports in traces.
///
/// Order is load-bearing. Narrow historical shapes sit above the broad
/// lookups so a legacy URL is recognized before a generic rule swallows
/// it, and the pagination and language rules sit above the slug rules
/// so numeric and language segments are never mistaken for slugs.
pub(crate) const CASCADE: &[(&str, Rule)] = &[
    ("asset", asset_passthrough),
    ("mirror-host", mirror_host),
    ("root-page", root_page_number),
    ("static-page", static_page),
    ("listing-canonical", listing_canonical),
    ("listing-root", listing_root),
    ("language-listing", language_listing),
    ("slug-at-language", slug_at_language),
    ("category-listing", category_listing),
    ("category-slug", category_slug),
    ("listing-page", listing_page_number),
    ("legacy-page", legacy_page_number),
    ("bare-language", bare_language),
    ("bare-category", bare_language_category),
    ("category-shorthand", category_shorthand),
    ("nested-post", nested_post),
    ("flat-post", flat_post),
    ("deep-listing", deep_listing_slug),
    ("section-slug", section_slug),
    ("deep-catchall", deep_catchall),
    ("favicon", favicon_fallback),
];

fn is_page_number(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Page `n` under the listing; page 1 is the bare listing itself.
fn page_url(resolver: &Resolver, n: &str) -> String {
    if n == "1" {
        resolver.layout().listing_url().to_string()
    } else {
        resolver.layout().listing_join(&[n])
    }
}

/// Theme assets, feeds and other infrastructure paths map straight into
/// the content tree. Directories serve their index document, plain
/// files serve as-is, anything else falls through.
fn asset_passthrough(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let first = *route.segments().first()?;
    if !resolver.layout().is_asset_prefix(first) {
        return None;
    }

    let mapped = resolver.layout().content_path(route.segments());
    if mapped.is_dir() {
        let index = mapped.join(INDEX_FILE);
        if index.is_file() {
            return Some(Resolution::Serve(index));
        }
    }
    if !route.trailing_slash() && mapped.is_file() {
        return Some(Resolution::Serve(mapped));
    }

    None
}

/// A retired mirror hostname pasted into the path collapses to the
/// listing root.
fn mirror_host(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let host = match route.segments() {
        &[host] => host,
        &[host, INDEX_FILE] if !route.trailing_slash() => host,
        _ => return None,
    };
    resolver
        .layout()
        .is_mirror_host(host)
        .then(|| Resolution::Redirect(resolver.layout().listing_url().to_string()))
}

/// `/3` and friends are page numbers that lost their listing prefix.
fn root_page_number(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let n = match route.segments() {
        &[n] => n,
        &[n, INDEX_FILE] if !route.trailing_slash() => n,
        _ => return None,
    };
    is_page_number(n).then(|| Resolution::Redirect(page_url(resolver, n)))
}

/// Singleton pages exported beside the listing content but served at
/// the domain root, e.g. `/faq`. The bare form serves, the dressed
/// forms redirect to it, and a missing export is a dead end.
fn static_page(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    match route.segments() {
        &[page] if layout.is_static_page(page) => {
            if route.trailing_slash() {
                return Some(Resolution::Redirect(format!("/{page}")));
            }
            let index = layout.content_index(&[page]);
            if index.is_file() {
                Some(Resolution::Serve(index))
            } else {
                Some(Resolution::NotFound)
            }
        }
        &[page, INDEX_FILE] if !route.trailing_slash() && layout.is_static_page(page) => {
            Some(Resolution::Redirect(format!("/{page}")))
        }
        _ => None,
    }
}

/// The listing root has exactly one public form: no trailing slash, no
/// index document. `/blog/index.html` is the exception, an old
/// navigation widget linked it and it lands on the default language
/// listing.
fn listing_canonical(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let rest = route.under(layout.listing_name())?;
    match rest {
        [] if route.trailing_slash() => {
            Some(Resolution::Redirect(layout.listing_url().to_string()))
        }
        &[INDEX_FILE] if !route.trailing_slash() => Some(Resolution::Redirect(
            layout.listing_join(&[layout.default_language()]),
        )),
        _ => None,
    }
}

/// Bare `/blog` serves the top-level listing.
fn listing_root(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let rest = route.under(layout.listing_name())?;
    (rest.is_empty() && !route.trailing_slash())
        .then(|| Resolution::Serve(layout.content_index(&[])))
}

/// `/blog/us` is a language listing. Terminal either way: a missing
/// language export is a dead end, not a slug.
fn language_listing(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let rest = route.under(layout.listing_name())?;
    match rest {
        &[lang] if !route.trailing_slash() && layout.is_language(lang) => {
            let index = layout.content_index(&[lang]);
            if index.is_file() {
                Some(Resolution::Serve(index))
            } else {
                Some(Resolution::NotFound)
            }
        }
        _ => None,
    }
}

/// `/blog/us/<name>/` and `/blog/us/<name>/index.html`: the dressed
/// forms under a language redirect to `<name>`'s canonical URL when it
/// is a known slug. The bare form belongs to the category rules below.
fn slug_at_language(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let rest = route.under(layout.listing_name())?;
    let name = match rest {
        &[lang, name, INDEX_FILE] if !route.trailing_slash() && layout.is_language(lang) => name,
        &[lang, name] if route.trailing_slash() && layout.is_language(lang) => name,
        _ => return None,
    };
    let record = resolver.slug_on_disk(name)?;
    Some(resolver.canonical_redirect(record))
}

/// `/blog/us/tips` serves the category listing when it exists. A miss
/// falls through on purpose: the same shape is still checked as a
/// category/slug pair by the next rule.
fn category_listing(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let rest = route.under(layout.listing_name())?;
    match rest {
        &[lang, category] if !route.trailing_slash() && layout.is_language(lang) => {
            let index = layout.content_index(&[lang, category]);
            index.is_file().then(|| Resolution::Serve(index))
        }
        _ => None,
    }
}

/// `/blog/<anything>/<slug>/` and the index.html form. The first
/// segment is deliberately not checked: inbound legacy links carry
/// wrong or renamed category segments surprisingly often, and the slug
/// alone identifies the post.
fn category_slug(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let rest = route.under(resolver.layout().listing_name())?;
    let slug = match rest {
        &[_, slug, INDEX_FILE] if !route.trailing_slash() => slug,
        &[_, slug] if route.trailing_slash() => slug,
        _ => return None,
    };
    let record = resolver.slug_on_disk(slug)?;
    Some(resolver.canonical_redirect(record))
}

/// `/blog/<n>`: page 1 is the bare listing, other pages serve their
/// exported directory. Terminal either way.
fn listing_page_number(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let rest = route.under(layout.listing_name())?;
    match rest {
        &[n] if !route.trailing_slash() && is_page_number(n) => {
            if n == "1" {
                return Some(Resolution::Redirect(layout.listing_url().to_string()));
            }
            let index = layout.content_index(&["page", n]);
            if index.is_file() {
                Some(Resolution::Serve(index))
            } else {
                Some(Resolution::NotFound)
            }
        }
        _ => None,
    }
}

/// `/blog/page/<n>` in any dressing redirects to `/blog/<n>`,
/// collapsing page 1 to the bare listing.
fn legacy_page_number(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let rest = route.under(resolver.layout().listing_name())?;
    let n = match rest {
        &["page", n, INDEX_FILE] if !route.trailing_slash() => n,
        &["page", n] => n,
        _ => return None,
    };
    is_page_number(n).then(|| Resolution::Redirect(page_url(resolver, n)))
}

/// `/us` in any dressing gains the listing prefix.
fn bare_language(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let lang = match route.segments() {
        &[lang] => lang,
        &[lang, INDEX_FILE] if !route.trailing_slash() => lang,
        _ => return None,
    };
    layout
        .is_language(lang)
        .then(|| Resolution::Redirect(layout.listing_join(&[lang])))
}

/// `/us/tips` gains the listing prefix too, but only when the category
/// listing actually exists; otherwise deeper rules get a shot.
fn bare_language_category(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let (lang, category) = match route.segments() {
        &[lang, category] => (lang, category),
        &[lang, category, INDEX_FILE] if !route.trailing_slash() => (lang, category),
        _ => return None,
    };
    if !layout.is_language(lang) || !layout.content_index(&[lang, category]).is_file() {
        return None;
    }
    Some(Resolution::Redirect(layout.listing_join(&[lang, category])))
}

/// `/blog/tips`: no language given, so probe each language in its
/// configured order and redirect to the first one that has this
/// category.
fn category_shorthand(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    let rest = route.under(layout.listing_name())?;
    match rest {
        &[name] if !route.trailing_slash() => layout.languages().iter().find_map(|lang| {
            layout
                .content_index(&[lang, name])
                .is_file()
                .then(|| Resolution::Redirect(layout.listing_join(&[lang, name])))
        }),
        _ => None,
    }
}

/// `/blog/<lang>/<category>/<slug>`: the canonical shape. Serves when
/// the index agrees this is where the slug lives; anything else is
/// redirected to where it actually lives. Terminal, an unknown slug at
/// this depth is a dead end.
fn nested_post(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let rest = route.under(resolver.layout().listing_name())?;
    let (lang, category, slug) = match rest {
        &[lang, category, slug] if !route.trailing_slash() => (lang, category, slug),
        _ => return None,
    };
    let Some(record) = resolver.slug_on_disk(slug) else {
        return Some(Resolution::NotFound);
    };
    if record.language.as_deref() == Some(lang) && record.category.as_deref() == Some(category) {
        Some(Resolution::Serve(record.index_file.clone()))
    } else {
        Some(resolver.canonical_redirect(record))
    }
}

/// `/blog/<slug>`: the flat WordPress shape. Slugs that moved into a
/// language/category directory redirect there; slugs that still live
/// flat are already at their canonical URL, so they serve directly
/// rather than redirecting to themselves. Terminal.
fn flat_post(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let rest = route.under(resolver.layout().listing_name())?;
    let slug = match rest {
        &[slug] if !route.trailing_slash() => slug,
        _ => return None,
    };
    let Some(record) = resolver.slug_on_disk(slug) else {
        return Some(Resolution::NotFound);
    };
    if record.language.is_none() {
        Some(Resolution::Serve(record.index_file.clone()))
    } else {
        Some(resolver.canonical_redirect(record))
    }
}

/// Anything deeper under the listing ending in `/index.html` or a
/// trailing slash gets one last slug lookup on its final directory
/// segment.
fn deep_listing_slug(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let rest = route.under(resolver.layout().listing_name())?;
    if !route.trailing_slash()
        && let &[.., slug, INDEX_FILE] = rest
    {
        let record = resolver.index().get(slug)?;
        return Some(resolver.canonical_redirect(record));
    }
    if route.trailing_slash()
        && let &[.., slug] = rest
    {
        let record = resolver.slug_on_disk(slug)?;
        return Some(resolver.canonical_redirect(record));
    }
    None
}

/// Old-site deep shapes without the listing prefix, gated to the
/// sections the old site actually had, e.g. `/tag/moving/<slug>/`.
fn section_slug(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let first = *route.segments().first()?;
    if !resolver.layout().is_section_prefix(first) {
        return None;
    }

    if !route.trailing_slash()
        && let &[_, .., slug, INDEX_FILE] = route.segments()
    {
        let record = resolver.index().get(slug)?;
        return Some(resolver.canonical_redirect(record));
    }
    if route.trailing_slash()
        && let &[_, .., slug] = route.segments()
    {
        let record = resolver.slug_on_disk(slug)?;
        return Some(resolver.canonical_redirect(record));
    }
    None
}

/// The same last-ditch lookup for deep shapes outside both the listing
/// and the known sections.
fn deep_catchall(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    if route.under(resolver.layout().listing_name()).is_some() {
        return None;
    }

    if !route.trailing_slash()
        && let &[_, .., slug, INDEX_FILE] = route.segments()
    {
        let record = resolver.index().get(slug)?;
        return Some(resolver.canonical_redirect(record));
    }
    if route.trailing_slash()
        && let &[_, .., slug] = route.segments()
    {
        let record = resolver.slug_on_disk(slug)?;
        return Some(resolver.canonical_redirect(record));
    }
    None
}

/// Serve the content tree's favicon when the workspace has none.
fn favicon_fallback(resolver: &Resolver, route: &Route) -> Option<Resolution> {
    let layout = resolver.layout();
    match route.segments() {
        &["favicon.ico"] if !route.trailing_slash() => {
            if layout.workspace().join("favicon.ico").is_file() {
                return None;
            }
            let fallback = layout.content_root().join("favicon.ico");
            fallback.is_file().then(|| Resolution::Serve(fallback))
        }
        _ => None,
    }
}
