macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// Shorthand for return Err(NakloError::new(ErrorKind::Foo))
//
// Usage:
// - err!(Variant)          -> return Err(NakloError::new(ErrorKind::Variant))
// - err!(Variant(Message)) -> return Err(NakloError::new(ErrorKind::Variant(Message)))
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::NakloError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::NakloError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
}

// Shorthand for NakloError::from(ContainerError::Foo)
//
// Usage:
//
// - container_err!(NotAFlacFile)
// - container_err!(MalformedBlockChain, "Message")
//
// or bail:
//
// - container_err!(@BAIL NotAFlacFile)
// - container_err!(@BAIL MalformedBlockChain, "Message")
macro_rules! container_err {
	(@BAIL $($args:tt)+) => {
		return Err(container_err!($($args)+))
	};
	($variant:ident, $reason:literal) => {
		Into::<crate::error::NakloError>::into(crate::error::ContainerError::$variant($reason))
	};
	($variant:ident) => {
		Into::<crate::error::NakloError>::into(crate::error::ContainerError::$variant)
	};
}

// Shorthand for return Err(NakloError::from(TagFileError::Foo { line }))
macro_rules! tag_file_err {
	(@BAIL $variant:ident $({ $($field:ident: $value:expr),+ })?) => {
		return Err(Into::<crate::error::NakloError>::into(
			crate::error::TagFileError::$variant $({ $($field: $value),+ })?,
		))
	};
}

pub(crate) use {container_err, err, tag_file_err, try_vec};
