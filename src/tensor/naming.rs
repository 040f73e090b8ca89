/// Append a transformation marker such as `"__uu"` or `"__lt"` to a tensor name.
///
/// Unnamed tensors stay unnamed.
pub fn change_name(name: Option<&str>, context: &str) -> Option<String> {
    name.map(|n| format!("{n}{context}"))
}
