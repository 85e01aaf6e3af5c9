/// Errors surfaced by the margin component to its host.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum MarginError {
	/// The component was used after [`crate::AnnotationMargin::dispose`].
	#[error("margin component used after dispose")]
	Disposed,
	/// A required collaborator was not supplied at construction.
	#[error("missing required collaborator: {0}")]
	MissingCollaborator(&'static str),
	/// The downstream annotation service failed.
	#[error(transparent)]
	Annotation(#[from] AnnotationError),
}

/// Failure of a downstream `prepare_annotation` call.
#[derive(Debug, Clone, thiserror::Error)]
#[non_exhaustive]
pub enum AnnotationError {
	#[error("annotation preparation failed: {0}")]
	Failed(String),
	#[error("annotation preparation cancelled")]
	Cancelled,
}
