//! Translation between engine-native codes and the public vocabulary.
//!
//! Raw codes are first decoded into the engine's closed enums, which fails
//! for codes outside the known set, and then mapped by exhaustive matches.

use crate::error::SessionResult;
use crate::types::{ConnectionState, ProgressDirection, SessionState};
use syncbridge_engine::{EngineConnectionState, EngineProgressDirection, EngineSessionState};

/// Translates a raw connection state code.
pub fn connection_state_from_engine(code: u8) -> SessionResult<ConnectionState> {
    Ok(match EngineConnectionState::try_from(code)? {
        EngineConnectionState::Disconnected => ConnectionState::Disconnected,
        EngineConnectionState::Connecting => ConnectionState::Connecting,
        EngineConnectionState::Connected => ConnectionState::Connected,
    })
}

/// Maps a public connection state to its engine counterpart.
pub fn connection_state_to_engine(state: ConnectionState) -> EngineConnectionState {
    match state {
        ConnectionState::Disconnected => EngineConnectionState::Disconnected,
        ConnectionState::Connecting => EngineConnectionState::Connecting,
        ConnectionState::Connected => EngineConnectionState::Connected,
    }
}

/// Translates a raw session state code.
///
/// Only `Inactive` maps to [`SessionState::Inactive`]; every other engine
/// state, transitional ones included, reads as [`SessionState::Active`].
/// [`SessionState::Invalid`] is never produced here.
pub fn session_state_from_engine(code: u8) -> SessionResult<SessionState> {
    Ok(match EngineSessionState::try_from(code)? {
        EngineSessionState::Inactive => SessionState::Inactive,
        EngineSessionState::Active
        | EngineSessionState::Dying
        | EngineSessionState::WaitingForAccessToken
        | EngineSessionState::Paused => SessionState::Active,
    })
}

/// Translates a raw progress direction code.
pub fn progress_direction_from_engine(code: u8) -> SessionResult<ProgressDirection> {
    Ok(match EngineProgressDirection::try_from(code)? {
        EngineProgressDirection::Download => ProgressDirection::Download,
        EngineProgressDirection::Upload => ProgressDirection::Upload,
    })
}

/// Maps a public progress direction to its engine counterpart.
pub fn progress_direction_to_engine(direction: ProgressDirection) -> EngineProgressDirection {
    match direction {
        ProgressDirection::Download => EngineProgressDirection::Download,
        ProgressDirection::Upload => EngineProgressDirection::Upload,
    }
}

/// Whether a session in `state` with `connection` counts as connected.
///
/// A session that is `Dying` is still uploading its last changes and counts.
pub fn counts_as_connected(connection: EngineConnectionState, state: EngineSessionState) -> bool {
    connection == EngineConnectionState::Connected
        && matches!(state, EngineSessionState::Active | EngineSessionState::Dying)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SessionError;
    use proptest::prelude::*;
    use std::collections::HashSet;
    use syncbridge_testkit::generators::{
        connection_state_strategy, direction_strategy, session_state_strategy,
        unknown_connection_code_strategy, unknown_direction_code_strategy,
        unknown_session_code_strategy,
    };

    #[test]
    fn connection_states_round_trip() {
        for state in ConnectionState::ALL {
            let engine = connection_state_to_engine(state);
            assert_eq!(connection_state_from_engine(engine.code()).unwrap(), state);
        }
    }

    #[test]
    fn directions_round_trip() {
        for direction in ProgressDirection::ALL {
            let engine = progress_direction_to_engine(direction);
            assert_eq!(
                progress_direction_from_engine(engine.code()).unwrap(),
                direction
            );
        }
    }

    #[test]
    fn engine_values_map_to_distinct_public_values() {
        let seen: HashSet<ConnectionState> = EngineConnectionState::ALL
            .iter()
            .map(|s| connection_state_from_engine(s.code()).unwrap())
            .collect();
        assert_eq!(seen.len(), EngineConnectionState::ALL.len());
        assert_eq!(seen.len(), ConnectionState::ALL.len());
    }

    #[test]
    fn session_state_collapses_to_active() {
        let expected = [
            (EngineSessionState::Active, SessionState::Active),
            (EngineSessionState::Dying, SessionState::Active),
            (EngineSessionState::Inactive, SessionState::Inactive),
            (EngineSessionState::WaitingForAccessToken, SessionState::Active),
            (EngineSessionState::Paused, SessionState::Active),
        ];
        for (engine, public) in expected {
            assert_eq!(session_state_from_engine(engine.code()).unwrap(), public);
        }
    }

    #[test]
    fn connected_truth_table() {
        for connection in EngineConnectionState::ALL {
            for state in EngineSessionState::ALL {
                let expected = connection == EngineConnectionState::Connected
                    && (state == EngineSessionState::Active || state == EngineSessionState::Dying);
                assert_eq!(
                    counts_as_connected(connection, state),
                    expected,
                    "{connection:?} / {state:?}"
                );
            }
        }
    }

    proptest! {
        #[test]
        fn known_connection_codes_translate_back(state in connection_state_strategy()) {
            let public = connection_state_from_engine(state.code()).unwrap();
            prop_assert_eq!(connection_state_to_engine(public), state);
        }

        #[test]
        fn known_session_codes_translate(state in session_state_strategy()) {
            let public = session_state_from_engine(state.code()).unwrap();
            prop_assert_ne!(public, SessionState::Invalid);
            prop_assert_eq!(
                public == SessionState::Inactive,
                state == EngineSessionState::Inactive
            );
        }

        #[test]
        fn known_directions_translate_back(direction in direction_strategy()) {
            let public = progress_direction_from_engine(direction.code()).unwrap();
            prop_assert_eq!(progress_direction_to_engine(public), direction);
        }

        #[test]
        fn unknown_connection_codes_fail(code in unknown_connection_code_strategy()) {
            prop_assert_eq!(
                connection_state_from_engine(code),
                Err(SessionError::UnrecognizedEnumValue { kind: "connection state", value: code })
            );
        }

        #[test]
        fn unknown_session_codes_fail(code in unknown_session_code_strategy()) {
            prop_assert_eq!(
                session_state_from_engine(code),
                Err(SessionError::UnrecognizedEnumValue { kind: "session state", value: code })
            );
        }

        #[test]
        fn unknown_direction_codes_fail(code in unknown_direction_code_strategy()) {
            prop_assert_eq!(
                progress_direction_from_engine(code),
                Err(SessionError::UnrecognizedEnumValue { kind: "progress direction", value: code })
            );
        }
    }
}
