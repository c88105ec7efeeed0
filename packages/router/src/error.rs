/// An error produced by the [`RouterStore`](crate::RouterStore).
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    /// A navigation request named neither a URL nor a path.
    #[error("navigation requires either a url or a path")]
    EmptyNavigation,
    /// The navigation target could not be turned into a URL.
    #[error("invalid navigation target: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Two routes passed to the same router share a name.
    #[error(r#"route names must be unique; duplicate name: "{0}""#)]
    DuplicateRouteName(String),
}
