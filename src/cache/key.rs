//! Result Key Codec Module
//!
//! Derives the cache's internal result identifier from the ordered argument
//! list of a read operation (command name plus operands).
//!
//! The encoding is length-prefixed: all argument byte lengths come first,
//! then all argument contents, every piece joined by a single separator.
//! `["GET", "user:1"]` becomes `"3_6_GET_user:1"`. Because each length is
//! committed up front, two different argument splits of the same characters
//! (`["ab", "c"]` vs `["a", "bc"]`) can never collide, and arguments that
//! contain the separator cannot forge a boundary.

// == Constants ==
/// Separator between encoded lengths and argument contents.
pub const KEY_SEPARATOR: char = '_';

// == Result Key ==
/// Computes the result identifier for an ordered argument list.
///
/// Identical argument lists always produce identical keys, so repeated
/// calls of the same operation land on the same cache entry. Distinct
/// ordered argument lists always produce distinct keys.
///
/// Runs in a single pass, linear in total argument length, with the
/// output pre-sized to avoid reallocation.
///
/// # Arguments
/// * `args` - The operation's ordered arguments (may be empty)
pub fn result_key(args: &[String]) -> String {
    if args.is_empty() {
        return String::new();
    }

    // Worst case per argument: 20 digits of length tag plus two separators.
    let content_len: usize = args.iter().map(|a| a.len()).sum();
    let mut key = String::with_capacity(content_len + args.len() * 22);

    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            key.push(KEY_SEPARATOR);
        }
        key.push_str(&arg.len().to_string());
    }
    for arg in args {
        key.push(KEY_SEPARATOR);
        key.push_str(arg);
    }

    key
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn args(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_argument() {
        assert_eq!(result_key(&args(&["GET"])), "3_GET");
    }

    #[test]
    fn test_command_and_operand() {
        assert_eq!(result_key(&args(&["GET", "user:1"])), "3_6_GET_user:1");
    }

    #[test]
    fn test_multi_key_read() {
        assert_eq!(
            result_key(&args(&["MGET", "user:1", "user:2"])),
            "4_6_6_MGET_user:1_user:2"
        );
    }

    #[test]
    fn test_stable_across_repeated_calls() {
        let a = args(&["HGETALL", "session:42"]);
        assert_eq!(result_key(&a), result_key(&a.clone()));
    }

    #[test]
    fn test_split_collision_resistance() {
        // Same concatenated characters, different splits.
        assert_ne!(result_key(&args(&["ab", "c"])), result_key(&args(&["a", "bc"])));
        assert_eq!(result_key(&args(&["ab", "c"])), "2_1_ab_c");
        assert_eq!(result_key(&args(&["a", "bc"])), "1_2_a_bc");
    }

    #[test]
    fn test_separator_in_argument_cannot_forge_boundary() {
        // "a_b" as one argument vs "a" and "b" as two.
        assert_ne!(result_key(&args(&["a_b"])), result_key(&args(&["a", "b"])));
        assert_eq!(result_key(&args(&["a_b"])), "3_a_b");
        assert_eq!(result_key(&args(&["a", "b"])), "1_1_a_b");
    }

    #[test]
    fn test_zero_length_argument_is_tagged() {
        assert_eq!(result_key(&args(&["GET", ""])), "3_0_GET_");
        // An empty trailing argument still differs from its absence.
        assert_ne!(result_key(&args(&["GET", ""])), result_key(&args(&["GET"])));
    }

    #[test]
    fn test_empty_argument_list() {
        assert_eq!(result_key(&[]), "");
    }

    #[test]
    fn test_order_matters() {
        assert_ne!(
            result_key(&args(&["MGET", "a", "b"])),
            result_key(&args(&["MGET", "b", "a"]))
        );
    }

    #[test]
    fn test_multibyte_lengths_are_bytes() {
        // "é" is two bytes in UTF-8; the tag is the byte length.
        assert_eq!(result_key(&args(&["é"])), "2_é");
    }
}
