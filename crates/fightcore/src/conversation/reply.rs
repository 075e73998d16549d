//! Transport-neutral outgoing messages

/// Reply keyboard attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Rows of button labels
    Buttons(Vec<Vec<String>>),
    /// Hide the current keyboard
    Remove,
}

impl Keyboard {
    pub fn rows<R, S>(rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Keyboard::Buttons(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    /// All button labels, row by row
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Keyboard::Buttons(rows) => rows.iter().flatten().map(String::as_str).collect(),
            Keyboard::Remove => Vec::new(),
        }
    }
}

/// One outgoing message.
///
/// `keyboard: None` leaves whatever keyboard the chat already shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub keyboard: Option<Keyboard>,
    /// Text is HTML (user content already escaped)
    pub html: bool,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            html: false,
        }
    }

    pub fn html(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: None,
            html: true,
        }
    }

    pub fn with_keyboard(mut self, keyboard: Keyboard) -> Self {
        self.keyboard = Some(keyboard);
        self
    }
}
