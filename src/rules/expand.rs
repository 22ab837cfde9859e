use crate::rules::rewriter::MatchInfo;

/// Expand a replacement template against one match, appending to `out`.
///
/// Recognized sequences: `$$`, `$&`, `` $` ``, `$'`, `$n`/`$nn` for capture
/// groups 1-99 and `$<name>` when the pattern has named groups. Anything
/// else, including `$0`, is copied through unchanged.
pub(crate) fn expand_template(template: &str, m: &MatchInfo<'_>, out: &mut String) {
	let bytes = template.as_bytes();
	let mut i = 0;
	let mut last = 0;

	while i < bytes.len() {
		if bytes[i] != b'$' || i + 1 >= bytes.len() {
			i += 1;
			continue;
		}

		let expansion: Option<(&str, usize)> = match bytes[i + 1] {
			b'$' => Some(("$", 2)),
			b'&' => Some((m.matched, 2)),
			b'`' => Some((m.before(), 2)),
			b'\'' => Some((m.after(), 2)),
			b'0'..=b'9' => group_reference(bytes, i + 1, m.groups.len())
				.map(|(index, digits)| (m.groups[index - 1].unwrap_or(""), 1 + digits)),
			b'<' if !m.named.is_empty() => template[i + 2..].find('>').map(|end| {
				let name = &template[i + 2..i + 2 + end];
				(m.name(name).unwrap_or(""), end + 3)
			}),
			_ => None,
		};

		match expansion {
			Some((text, consumed)) => {
				out.push_str(&template[last..i]);
				out.push_str(text);
				i += consumed;
				last = i;
			}
			None => i += 1,
		}
	}

	out.push_str(&template[last..]);
}

/// Resolve `$n` / `$nn` starting at the first digit.
///
/// Returns the group index and the number of digits consumed. A two-digit
/// reference falls back to one digit when the larger group does not exist.
fn group_reference(bytes: &[u8], start: usize, group_count: usize) -> Option<(usize, usize)> {
	let first = usize::from(bytes[start] - b'0');

	if let Some(&second) = bytes.get(start + 1)
		&& second.is_ascii_digit()
	{
		let index = first * 10 + usize::from(second - b'0');
		if (1..=group_count).contains(&index) {
			return Some((index, 2));
		}
	}

	if (1..=group_count).contains(&first) {
		return Some((first, 1));
	}

	None
}
