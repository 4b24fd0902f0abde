use serde_json::Value;

/// Render a single value as one line.
///
/// Strings pass through untouched. Other values render structurally
/// (multi-line, nested fields indented) when `inspect` is on, and as their
/// compact one-line JSON form when it is off.
pub fn render_value(value: &Value, inspect: bool) -> String {
    match value {
        Value::String(text) => text.clone(),
        other if inspect => {
            serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string())
        }
        other => other.to_string(),
    }
}

/// Render an argument list as one line.
///
/// A single argument takes the [`render_value`] contract. Multiple
/// arguments take the placeholder contract: a string first argument is a
/// template with `%s` (plain rendering), `%d` (numeric rendering), `%j`
/// (compact JSON) and `%%` directives, and arguments beyond the
/// placeholders are appended space-separated. Placeholders without a
/// matching argument and unknown directives stay literal. A non-string
/// first argument disables substitution and everything is plain-rendered
/// and space-joined.
pub fn format_args(args: &[Value], inspect: bool) -> String {
    if args.is_empty() {
        return String::new();
    }
    if args.len() == 1 {
        return render_value(&args[0], inspect);
    }
    match &args[0] {
        Value::String(template) => substitute(template, &args[1..]),
        _ => {
            let parts: Vec<String> = args.iter().map(|arg| render_value(arg, false)).collect();
            parts.join(" ")
        }
    }
}

fn substitute(template: &str, args: &[Value]) -> String {
    let mut chars = template.chars().peekable();
    let mut out = String::new();
    let mut next_arg = 0;

    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let directive = match chars.peek() {
            Some(&d) => d,
            None => {
                out.push('%');
                break;
            }
        };
        match directive {
            '%' => {
                chars.next();
                out.push('%');
            }
            's' | 'd' | 'j' if next_arg < args.len() => {
                chars.next();
                let arg = &args[next_arg];
                next_arg += 1;
                match directive {
                    's' => out.push_str(&render_value(arg, false)),
                    'd' => out.push_str(&numeric(arg)),
                    _ => out.push_str(&arg.to_string()),
                }
            }
            _ => out.push('%'),
        }
    }

    for arg in &args[next_arg..] {
        out.push(' ');
        out.push_str(&render_value(arg, false));
    }
    out
}

fn numeric(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::String(text) => match text.parse::<f64>() {
            // 9e15 keeps the cast within f64's exact integer range
            Ok(parsed) if parsed.is_finite() && parsed.fract() == 0.0 && parsed.abs() < 9e15 => {
                format!("{}", parsed as i64)
            }
            Ok(parsed) => parsed.to_string(),
            Err(_) => "NaN".to_string(),
        },
        _ => "NaN".to_string(),
    }
}
