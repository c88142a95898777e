//! Named commands driving the app core, plus the console grammar.

use airband_core::filter::FilterField;
use airband_core::view::SortKey;

/// All commands the presentation layer can issue.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Play the selected entry, or the given visible row first.
    Activate { row: Option<usize> },
    /// Play an address typed by the user (goes through the watch list).
    ActivateCustom(String),
    Stop,
    Filter(FilterField, String),
    ClearFilter,
    Sort(SortKey),
    CycleSort,
    SelectUp(usize),
    SelectDown(usize),
    SelectFirst,
    SelectLast,
    Random,
    /// Volume in percent, 0–100.
    Volume(u8),
    List,
    Help,
    Quit,
}

/// Parse one console line.
///
/// Grammar:
///   play [row] | open <address> | stop | filter <field> <pattern…> |
///   filter <field>            (clears that field)
///   clear | sort [key] | up [n] | down [n] | top | bottom |
///   random | volume <0-100> | list | help | quit
pub fn parse_line(line: &str) -> Result<AppCommand, String> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Err("empty command".to_string());
    };
    let rest: Vec<&str> = parts.collect();

    match word.to_lowercase().as_str() {
        "play" | "p" => match rest.first() {
            None => Ok(AppCommand::Activate { row: None }),
            Some(n) => n
                .parse::<usize>()
                .map(|row| AppCommand::Activate { row: Some(row) })
                .map_err(|_| format!("not a row number: {}", n)),
        },
        "open" | "o" => {
            if rest.is_empty() {
                Err("usage: open <address>".to_string())
            } else {
                Ok(AppCommand::ActivateCustom(rest.join(" ")))
            }
        }
        "stop" | "s" => Ok(AppCommand::Stop),
        "filter" | "f" => {
            let Some(field_word) = rest.first() else {
                return Err("usage: filter <field> [pattern]".to_string());
            };
            let Some(field) = FilterField::parse(field_word) else {
                return Err(format!(
                    "unknown field: {} (directory, name, address, type, genre)",
                    field_word
                ));
            };
            Ok(AppCommand::Filter(field, rest[1..].join(" ")))
        }
        "clear" | "c" => Ok(AppCommand::ClearFilter),
        "sort" => match rest.first() {
            None => Ok(AppCommand::CycleSort),
            Some(key_word) => SortKey::parse(key_word)
                .map(AppCommand::Sort)
                .ok_or_else(|| format!("unknown sort key: {}", key_word)),
        },
        "up" | "k" => Ok(AppCommand::SelectUp(parse_count(&rest)?)),
        "down" | "j" => Ok(AppCommand::SelectDown(parse_count(&rest)?)),
        "top" => Ok(AppCommand::SelectFirst),
        "bottom" => Ok(AppCommand::SelectLast),
        "random" | "r" => Ok(AppCommand::Random),
        "volume" | "v" => {
            let Some(n) = rest.first() else {
                return Err("usage: volume <0-100>".to_string());
            };
            n.parse::<u8>()
                .ok()
                .filter(|v| *v <= 100)
                .map(AppCommand::Volume)
                .ok_or_else(|| format!("volume must be 0-100, got {}", n))
        }
        "list" | "l" | "ls" => Ok(AppCommand::List),
        "help" | "h" | "?" => Ok(AppCommand::Help),
        "quit" | "q" | "exit" => Ok(AppCommand::Quit),
        other => Err(format!("unknown command: {} (try help)", other)),
    }
}

fn parse_count(rest: &[&str]) -> Result<usize, String> {
    match rest.first() {
        None => Ok(1),
        Some(n) => n
            .parse::<usize>()
            .map_err(|_| format!("not a count: {}", n)),
    }
}

pub const HELP_TEXT: &str = "\
commands:
  list                 show the directory view
  play [row]           play the selected (or given) station
  open <address>       play a custom address
  stop                 stop playback
  filter <field> <p>   set a field filter (directory, name, address, type, genre)
  filter <field>       clear one field
  clear                clear all filters
  sort [key]           set sort key, or cycle without one
  up/down [n], top, bottom
  random               play a random visible station
  volume <0-100>
  quit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_activate_forms() {
        assert_eq!(parse_line("play").unwrap(), AppCommand::Activate { row: None });
        assert_eq!(
            parse_line("play 7").unwrap(),
            AppCommand::Activate { row: Some(7) }
        );
        assert!(parse_line("play seven").is_err());
    }

    #[test]
    fn parses_filter_with_multiword_pattern() {
        assert_eq!(
            parse_line("filter genre drum and bass").unwrap(),
            AppCommand::Filter(FilterField::Genre, "drum and bass".to_string())
        );
    }

    #[test]
    fn filter_without_pattern_clears_that_field() {
        assert_eq!(
            parse_line("filter name").unwrap(),
            AppCommand::Filter(FilterField::Name, String::new())
        );
    }

    #[test]
    fn type_and_kind_both_name_the_type_field() {
        assert_eq!(
            parse_line("filter type mp3").unwrap(),
            AppCommand::Filter(FilterField::Kind, "mp3".to_string())
        );
        assert_eq!(
            parse_line("filter kind mp3").unwrap(),
            AppCommand::Filter(FilterField::Kind, "mp3".to_string())
        );
    }

    #[test]
    fn parses_sort_forms() {
        assert_eq!(parse_line("sort").unwrap(), AppCommand::CycleSort);
        assert_eq!(parse_line("sort name").unwrap(), AppCommand::Sort(SortKey::Name));
        assert!(parse_line("sort sideways").is_err());
    }

    #[test]
    fn parses_open_with_spaces_rejoined() {
        assert_eq!(
            parse_line("open http://example.com/stream").unwrap(),
            AppCommand::ActivateCustom("http://example.com/stream".to_string())
        );
        assert!(parse_line("open").is_err());
    }

    #[test]
    fn volume_bounds_checked() {
        assert_eq!(parse_line("volume 35").unwrap(), AppCommand::Volume(35));
        assert!(parse_line("volume 101").is_err());
        assert!(parse_line("volume loud").is_err());
    }

    #[test]
    fn unknown_command_is_an_error() {
        assert!(parse_line("dance").is_err());
    }
}
