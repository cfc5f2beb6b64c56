//! Tests for console command parsing

use patchbay_protocol::{ChannelId, ClientId};
use patchbay_routing::ChannelSelector;

use crate::{Command, CommandError};

fn one(index: u8) -> ChannelSelector {
    ChannelSelector::One(ChannelId::new(index).unwrap())
}

#[test]
fn test_parse_bare_commands() {
    assert_eq!(Command::parse("help").unwrap(), Some(Command::Help));
    assert_eq!(Command::parse("list").unwrap(), Some(Command::List));
    assert_eq!(Command::parse("routes").unwrap(), Some(Command::Routes));
    assert_eq!(Command::parse("exit").unwrap(), Some(Command::Exit));
}

#[test]
fn test_parse_blank_line_is_none() {
    assert_eq!(Command::parse("").unwrap(), None);
    assert_eq!(Command::parse("   \t ").unwrap(), None);
}

#[test]
fn test_bare_commands_reject_extra_arguments() {
    assert!(matches!(
        Command::parse("list everything"),
        Err(CommandError::Unknown(_))
    ));
    assert!(matches!(
        Command::parse("exit now"),
        Err(CommandError::Unknown(_))
    ));
}

#[test]
fn test_parse_route_with_fixed_channels() {
    let command = Command::parse("route 1 0 2 3").unwrap().unwrap();
    assert_eq!(
        command,
        Command::Route {
            src: ClientId::new(1),
            src_sel: one(0),
            dst: ClientId::new(2),
            dst_sel: one(3),
        }
    );
}

#[test]
fn test_parse_route_with_wildcards_and_prefixes() {
    let command = Command::parse("route 1 all 2 in4").unwrap().unwrap();
    assert_eq!(
        command,
        Command::Route {
            src: ClientId::new(1),
            src_sel: ChannelSelector::All,
            dst: ClientId::new(2),
            dst_sel: one(4),
        }
    );
}

#[test]
fn test_parse_route_argument_errors() {
    assert!(matches!(
        Command::parse("route 1 0 2"),
        Err(CommandError::Usage(_))
    ));
    assert!(matches!(
        Command::parse("route one 0 2 0"),
        Err(CommandError::InvalidClientId(_))
    ));
    assert!(matches!(
        Command::parse("route 1 7 2 0"),
        Err(CommandError::Channel(_))
    ));
    assert!(matches!(
        Command::parse("route 1 0 2 out3"),
        Err(CommandError::Channel(_))
    ));
}

#[test]
fn test_parse_print() {
    assert_eq!(
        Command::parse("print 4").unwrap(),
        Some(Command::Print { id: ClientId::new(4) })
    );
    assert!(matches!(Command::parse("print"), Err(CommandError::Usage(_))));
    assert!(matches!(
        Command::parse("print two"),
        Err(CommandError::InvalidClientId(_))
    ));
}

#[test]
fn test_parse_monitor_fps() {
    assert_eq!(
        Command::parse("monitor").unwrap(),
        Some(Command::Monitor { fps: None })
    );
    assert_eq!(
        Command::parse("monitor 10").unwrap(),
        Some(Command::Monitor { fps: Some(10) })
    );
    // Non-positive or unparseable rates fall back to the default
    assert_eq!(
        Command::parse("monitor 0").unwrap(),
        Some(Command::Monitor { fps: None })
    );
    assert_eq!(
        Command::parse("monitor -3").unwrap(),
        Some(Command::Monitor { fps: None })
    );
    assert_eq!(
        Command::parse("monitor fast").unwrap(),
        Some(Command::Monitor { fps: None })
    );
}

#[test]
fn test_parse_unknown_command() {
    let err = Command::parse("disconnect 3").unwrap_err();
    assert_eq!(err, CommandError::Unknown("disconnect 3".into()));
}

#[test]
fn test_help_text_mentions_every_command() {
    let help = crate::help_text();
    for name in ["help", "list", "routes", "route", "print", "monitor", "exit"] {
        assert!(help.contains(name), "help text missing '{name}'");
    }
}
