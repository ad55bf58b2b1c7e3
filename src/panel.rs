//! Inspection panel
//!
//! Two steps: pure builders turn detail records into a [`PanelView`] (what
//! to show), then [`render_html`] injects it into markup, escaping every
//! free-text field on the way. Nothing else writes panel markup.

use nexus_types::{Claim, EdgeDetail, EntityDetail};

pub const DEFAULT_GUIDANCE: &str =
    "Select an entity or relationship in the graph, or search by name, to see its details.";
pub const NO_ALIASES: &str = "No aliases.";
pub const NO_CLAIMS: &str = "No claims recorded.";
pub const NO_EDGE_CLAIMS: &str = "No claims recorded for this relationship.";
pub const NO_RELATED: &str = "No related entities.";
pub const UNKNOWN_SOURCE: &str = "Unknown source";
pub const UNDATED: &str = "undated";
pub const NO_STRENGTH: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimView {
    pub source: String,
    pub date: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityView {
    pub canonical: String,
    pub aliases: Vec<String>,
    pub claims: Vec<ClaimView>,
    /// Each one re-triggers focus + fetch when activated
    pub related: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeView {
    pub source: String,
    pub target: String,
    pub strength: String,
    pub claims: Vec<ClaimView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PanelView {
    #[default]
    Default,
    Entity(EntityView),
    Edge(EdgeView),
}

/// Dated claims first, newest first, then undated claims in received order
pub fn sort_claims(claims: &mut [Claim]) {
    claims.sort_by(|a, b| match (claim_date(a), claim_date(b)) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

fn claim_date(claim: &Claim) -> Option<&str> {
    claim.claim_date.as_deref().filter(|d| !d.is_empty())
}

fn claim_view(claim: &Claim) -> ClaimView {
    let date = claim_date(claim)
        .or(claim.date_added.as_deref().filter(|d| !d.is_empty()))
        .unwrap_or(UNDATED);
    ClaimView {
        source: claim
            .source
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(UNKNOWN_SOURCE)
            .to_string(),
        date: date.to_string(),
        content: claim.content.clone(),
    }
}

fn claim_views(claims: &[Claim]) -> Vec<ClaimView> {
    let mut claims = claims.to_vec();
    sort_claims(&mut claims);
    claims.iter().map(claim_view).collect()
}

pub fn entity_view(detail: &EntityDetail) -> EntityView {
    EntityView {
        canonical: detail.canonical.clone(),
        aliases: detail.aliases.clone(),
        claims: claim_views(&detail.claims),
        related: detail.related_entities.clone(),
    }
}

pub fn edge_view(detail: &EdgeDetail, strength: Option<f64>) -> EdgeView {
    EdgeView {
        source: detail.source.clone(),
        target: detail.target.clone(),
        strength: format_strength(strength),
        claims: claim_views(&detail.claims),
    }
}

/// Two decimal places, or "N/A" for a missing or non-finite strength
pub fn format_strength(strength: Option<f64>) -> String {
    match strength {
        Some(s) if s.is_finite() => format!("{:.2}", s),
        _ => NO_STRENGTH.to_string(),
    }
}

/// Escape text for insertion into markup (element content or quoted attribute)
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn render_html(view: &PanelView) -> String {
    match view {
        PanelView::Default => placeholder(DEFAULT_GUIDANCE),
        PanelView::Entity(entity) => format!(
            r#"<h2 class="entity-name">{name}</h2>
<section class="aliases">
<h3>Aliases</h3>
{aliases}
</section>
<section class="claims">
<h3>Claims</h3>
{claims}
</section>
<section class="related">
<h3>Related entities</h3>
{related}
</section>"#,
            name = escape_html(&entity.canonical),
            aliases = aliases_html(&entity.aliases),
            claims = claims_html(&entity.claims, NO_CLAIMS),
            related = related_html(&entity.related),
        ),
        PanelView::Edge(edge) => format!(
            r#"<h2 class="edge-title"><span class="edge-endpoint">{source}</span> &harr; <span class="edge-endpoint">{target}</span></h2>
<p class="edge-strength">Strength: {strength}</p>
<section class="claims">
<h3>Relationship claims</h3>
{claims}
</section>"#,
            source = escape_html(&edge.source),
            target = escape_html(&edge.target),
            strength = escape_html(&edge.strength),
            claims = claims_html(&edge.claims, NO_EDGE_CLAIMS),
        ),
    }
}

fn placeholder(text: &str) -> String {
    format!(r#"<p class="placeholder">{}</p>"#, escape_html(text))
}

fn aliases_html(aliases: &[String]) -> String {
    if aliases.is_empty() {
        return placeholder(NO_ALIASES);
    }
    let tags: String = aliases
        .iter()
        .map(|a| format!(r#"<li class="tag">{}</li>"#, escape_html(a)))
        .collect();
    format!(r#"<ul class="alias-list">{}</ul>"#, tags)
}

fn claims_html(claims: &[ClaimView], empty: &str) -> String {
    if claims.is_empty() {
        return placeholder(empty);
    }
    let items: String = claims
        .iter()
        .map(|c| {
            format!(
                r#"<li class="claim"><div class="claim-meta"><span class="claim-source">{}</span><span class="claim-date">{}</span></div><p class="claim-content">{}</p></li>"#,
                escape_html(&c.source),
                escape_html(&c.date),
                escape_html(&c.content),
            )
        })
        .collect();
    format!(r#"<ul class="claim-list">{}</ul>"#, items)
}

fn related_html(related: &[String]) -> String {
    if related.is_empty() {
        return placeholder(NO_RELATED);
    }
    let items: String = related
        .iter()
        .map(|name| {
            let name = escape_html(name);
            format!(
                r#"<li><button type="button" class="related-entity" data-entity="{}">{}</button></li>"#,
                name, name
            )
        })
        .collect();
    format!(r#"<ul class="related-list">{}</ul>"#, items)
}

/// Plain-text rendering for terminals
pub fn render_text(view: &PanelView) -> String {
    let mut out = String::new();
    match view {
        PanelView::Default => out.push_str(DEFAULT_GUIDANCE),
        PanelView::Entity(entity) => {
            out.push_str(&entity.canonical);
            out.push_str("\n\nAliases: ");
            if entity.aliases.is_empty() {
                out.push_str(NO_ALIASES);
            } else {
                out.push_str(&entity.aliases.join(", "));
            }
            out.push_str("\n\nClaims:\n");
            push_claims_text(&mut out, &entity.claims, NO_CLAIMS);
            out.push_str("\nRelated entities: ");
            if entity.related.is_empty() {
                out.push_str(NO_RELATED);
            } else {
                out.push_str(&entity.related.join(", "));
            }
        }
        PanelView::Edge(edge) => {
            out.push_str(&format!("{} <-> {}\n", edge.source, edge.target));
            out.push_str(&format!("Strength: {}\n\nClaims:\n", edge.strength));
            push_claims_text(&mut out, &edge.claims, NO_EDGE_CLAIMS);
        }
    }
    out
}

fn push_claims_text(out: &mut String, claims: &[ClaimView], empty: &str) {
    if claims.is_empty() {
        out.push_str("  ");
        out.push_str(empty);
        out.push('\n');
        return;
    }
    for claim in claims {
        out.push_str(&format!(
            "  [{} | {}] {}\n",
            claim.source, claim.date, claim.content
        ));
    }
}

/// Holds what the panel currently shows
#[derive(Debug, Clone, Default)]
pub struct PanelRenderer {
    view: PanelView,
    html: String,
}

impl PanelRenderer {
    pub fn new() -> Self {
        let mut renderer = Self::default();
        renderer.render_default();
        renderer
    }

    pub fn render_default(&mut self) {
        self.show(PanelView::Default);
    }

    pub fn render_entity(&mut self, detail: &EntityDetail) {
        self.show(PanelView::Entity(entity_view(detail)));
    }

    pub fn render_edge(&mut self, detail: &EdgeDetail, strength: Option<f64>) {
        self.show(PanelView::Edge(edge_view(detail, strength)));
    }

    pub fn view(&self) -> &PanelView {
        &self.view
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Related-entity references currently offered for activation
    pub fn related_entities(&self) -> &[String] {
        match &self.view {
            PanelView::Entity(entity) => &entity.related,
            _ => &[],
        }
    }

    fn show(&mut self, view: PanelView) {
        self.html = render_html(&view);
        self.view = view;
    }
}
