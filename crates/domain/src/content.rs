use std::fmt::Write;

use leadkit_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

/// Kind of marketing content shown as a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardKind {
    /// Service offering.
    Service,
    /// Industry landing teaser.
    Industry,
    /// Client quote.
    Testimonial,
    /// Pricing plan.
    PricingTier,
}

impl CardKind {
    /// Returns stable kind value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Service => "service",
            Self::Industry => "industry",
            Self::Testimonial => "testimonial",
            Self::PricingTier => "pricing_tier",
        }
    }
}

/// One content card record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ContentCardDocument", into = "ContentCardDocument")]
pub struct ContentCard {
    kind: CardKind,
    title: NonEmptyString,
    body: String,
    highlights: Vec<String>,
    call_to_action: Option<String>,
}

impl ContentCard {
    /// Creates a card with a non-empty title.
    pub fn new(
        kind: CardKind,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> AppResult<Self> {
        Ok(Self {
            kind,
            title: NonEmptyString::new(title)?,
            body: body.into(),
            highlights: Vec::new(),
            call_to_action: None,
        })
    }

    /// Adds bullet highlights such as plan features.
    #[must_use]
    pub fn with_highlights(mut self, highlights: Vec<String>) -> Self {
        self.highlights = highlights
            .into_iter()
            .map(|highlight| highlight.trim().to_owned())
            .filter(|highlight| !highlight.is_empty())
            .collect();
        self
    }

    /// Adds a call-to-action label, usually the service a lead dialog pre-selects.
    #[must_use]
    pub fn with_call_to_action(mut self, label: impl Into<String>) -> Self {
        let label = label.into();
        let trimmed = label.trim();
        self.call_to_action = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns the card kind.
    #[must_use]
    pub fn kind(&self) -> CardKind {
        self.kind
    }

    /// Returns the card title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the card body.
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Returns the highlight bullets.
    #[must_use]
    pub fn highlights(&self) -> &[String] {
        &self.highlights
    }

    /// Returns the call-to-action label.
    #[must_use]
    pub fn call_to_action(&self) -> Option<&str> {
        self.call_to_action.as_deref()
    }
}

#[derive(Serialize, Deserialize)]
struct ContentCardDocument {
    kind: CardKind,
    title: String,
    body: String,
    #[serde(default)]
    highlights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    call_to_action: Option<String>,
}

impl TryFrom<ContentCardDocument> for ContentCard {
    type Error = AppError;

    fn try_from(document: ContentCardDocument) -> Result<Self, Self::Error> {
        let card = Self::new(document.kind, document.title, document.body)?
            .with_highlights(document.highlights);

        Ok(match document.call_to_action {
            Some(label) => card.with_call_to_action(label),
            None => card,
        })
    }
}

impl From<ContentCard> for ContentCardDocument {
    fn from(card: ContentCard) -> Self {
        Self {
            kind: card.kind,
            title: card.title.into(),
            body: card.body,
            highlights: card.highlights,
            call_to_action: card.call_to_action,
        }
    }
}

/// Renders a card with the shared text template.
#[must_use]
pub fn render_card(card: &ContentCard) -> String {
    let mut rendered = format!("[{}] {}\n", card.kind().as_str(), card.title());
    if !card.body().trim().is_empty() {
        let _ = writeln!(rendered, "{}", card.body().trim());
    }
    for highlight in card.highlights() {
        let _ = writeln!(rendered, "  - {highlight}");
    }
    if let Some(call_to_action) = card.call_to_action() {
        let _ = writeln!(rendered, "  > {call_to_action}");
    }

    rendered
}

/// Ordered list of cards of one page section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardDeck(Vec<ContentCard>);

impl CardDeck {
    /// Creates a deck from cards in display order.
    #[must_use]
    pub fn new(cards: Vec<ContentCard>) -> Self {
        Self(cards)
    }

    /// Parses a deck from a JSON array of cards.
    pub fn from_json(document: &str) -> AppResult<Self> {
        serde_json::from_str(document)
            .map_err(|error| AppError::Validation(format!("invalid content cards: {error}")))
    }

    /// Returns cards in display order.
    #[must_use]
    pub fn cards(&self) -> &[ContentCard] {
        &self.0
    }

    /// Returns the cards of one kind.
    pub fn of_kind(&self, kind: CardKind) -> impl Iterator<Item = &ContentCard> {
        self.0.iter().filter(move |card| card.kind() == kind)
    }

    /// Renders every card, separated by blank lines.
    #[must_use]
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(render_card)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
