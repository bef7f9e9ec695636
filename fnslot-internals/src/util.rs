//! Internal utility types.

/// Marker type used when type-erasing a stored or referenced callable.
///
/// This zero-sized type serves as the pointee of every type-erased pointer in
/// this crate. A `NonNull<Erased>` points at some concrete callable `F`, but
/// the current scope does not know which one; only the function pointers that
/// were created together with the pointer do.
///
/// Using a distinct marker type (rather than `()`) makes the intent clearer
/// in type signatures and error messages.
pub(crate) struct Erased;
