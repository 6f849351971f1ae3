//! Go identifier derivation, matching protoc-gen-go

/// Camel-case a proto name into a Go identifier
///
/// # Examples
/// ```
/// use protoc_gen_vkit_parser::go_camel_case;
///
/// assert_eq!(go_camel_case("order_service"), "OrderService");
/// assert_eq!(go_camel_case("Outer.Inner"), "Outer_Inner");
/// assert_eq!(go_camel_case("_hidden"), "XHidden");
/// ```
pub fn go_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut prev: Option<char> = None;

    while let Some(c) = chars.next() {
        let next_is_lower = chars.peek().is_some_and(|n| n.is_ascii_lowercase());

        if c == '.' && next_is_lower {
            // dropped: ".x" continues the identifier
        } else if c == '.' {
            out.push('_');
        } else if c == '_' && matches!(prev, None | Some('.')) {
            out.push('X');
        } else if c == '_' && next_is_lower {
            // dropped: "_x" becomes "X"
        } else if c.is_ascii_digit() {
            out.push(c);
        } else {
            out.push(c.to_ascii_uppercase());
            prev = Some(c);
            while let Some(lower) = chars.next_if(|n| n.is_ascii_lowercase()) {
                out.push(lower);
                prev = Some(lower);
            }
            continue;
        }
        prev = Some(c);
    }

    out
}

/// Replace everything that cannot appear in a Go identifier with `_`
pub fn go_sanitized(s: &str) -> String {
    let mut out: String = s
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    if out.is_empty() || out.starts_with(|c: char| c.is_ascii_digit()) || is_go_keyword(&out) {
        out.insert(0, '_');
    }

    out
}

/// Go package name for a proto file
///
/// Precedence: explicit `;name` in `go_package`, last path segment of
/// `go_package`, the proto package, the file name.
pub fn go_package_name(go_package: Option<&str>, package: &str, file_name: &str) -> String {
    if let Some(go_package) = go_package.filter(|p| !p.is_empty()) {
        if let Some((_, name)) = go_package.split_once(';') {
            return go_sanitized(name);
        }
        let base = go_package.rsplit('/').next().unwrap_or(go_package);
        return go_sanitized(base);
    }

    if !package.is_empty() {
        return go_sanitized(package);
    }

    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    go_sanitized(base.strip_suffix(".proto").unwrap_or(base))
}

fn is_go_keyword(s: &str) -> bool {
    matches!(
        s,
        "break"
            | "case"
            | "chan"
            | "const"
            | "continue"
            | "default"
            | "defer"
            | "else"
            | "fallthrough"
            | "for"
            | "func"
            | "go"
            | "goto"
            | "if"
            | "import"
            | "interface"
            | "map"
            | "package"
            | "range"
            | "return"
            | "select"
            | "struct"
            | "switch"
            | "type"
            | "var"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_camel_case() {
        assert_eq!(go_camel_case("OrderService"), "OrderService");
        assert_eq!(go_camel_case("get_order"), "GetOrder");
        assert_eq!(go_camel_case("getOrder"), "GetOrder");
        assert_eq!(go_camel_case("Outer.Inner"), "Outer_Inner");
        assert_eq!(go_camel_case("outer.inner"), "OuterInner");
        assert_eq!(go_camel_case("v1_status2"), "V1Status2");
    }

    #[test]
    fn test_go_camel_case_keeps_multibyte_chars() {
        assert_eq!(go_camel_case("héllo_wörld"), "HélloWörld");
        assert_eq!(go_camel_case("_ñ"), "Xñ");
    }

    #[test]
    fn test_go_package_name() {
        assert_eq!(
            go_package_name(Some("example.com/app/proto/orderv1;orderpb"), "order.v1", "order.proto"),
            "orderpb"
        );
        assert_eq!(
            go_package_name(Some("example.com/app/proto/orderv1"), "order.v1", "order.proto"),
            "orderv1"
        );
        assert_eq!(go_package_name(None, "order.v1", "order.proto"), "order_v1");
        assert_eq!(go_package_name(None, "", "api/user-info.proto"), "user_info");
        assert_eq!(go_package_name(Some(""), "type", "x.proto"), "_type");
    }
}
