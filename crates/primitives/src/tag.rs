use std::any::Any;
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Name of an annotation tag kind, used to resolve a glyph factory.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TagKind(Cow<'static, str>);

impl TagKind {
	/// Placeholder kind. Providers offering it are skipped at registry build.
	pub const EMPTY: TagKind = TagKind(Cow::Borrowed(""));

	pub const fn from_static(name: &'static str) -> Self {
		Self(Cow::Borrowed(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Returns true for the placeholder kind.
	pub fn is_placeholder(&self) -> bool {
		self.0.is_empty()
	}
}

impl From<String> for TagKind {
	fn from(name: String) -> Self {
		Self(Cow::Owned(name))
	}
}

impl From<&'static str> for TagKind {
	fn from(name: &'static str) -> Self {
		Self::from_static(name)
	}
}

impl fmt::Display for TagKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// One annotation tag instance discovered on a line.
///
/// The payload is opaque to the engine; glyph factories downcast it to
/// whatever their tag kind carries.
#[derive(Clone)]
pub struct AnnotationTag {
	pub kind: TagKind,
	pub payload: Arc<dyn Any + Send + Sync>,
}

impl AnnotationTag {
	pub fn new(kind: impl Into<TagKind>, payload: Arc<dyn Any + Send + Sync>) -> Self {
		Self {
			kind: kind.into(),
			payload,
		}
	}

	/// Creates a tag with no payload.
	pub fn marker(kind: impl Into<TagKind>) -> Self {
		Self::new(kind, Arc::new(()))
	}

	/// Downcasts the payload to a concrete type.
	pub fn payload_as<T: Any + Send + Sync>(&self) -> Option<&T> {
		self.payload.downcast_ref::<T>()
	}
}

impl fmt::Debug for AnnotationTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AnnotationTag").field("kind", &self.kind).finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn payload_downcast_round_trip() {
		let tag = AnnotationTag::new("comment", Arc::new(42u32));
		assert_eq!(tag.payload_as::<u32>(), Some(&42));
		assert_eq!(tag.payload_as::<String>(), None);
	}

	#[test]
	fn placeholder_kind_detection() {
		assert!(TagKind::EMPTY.is_placeholder());
		assert!(!TagKind::from_static("comment").is_placeholder());
	}
}
