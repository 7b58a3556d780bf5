//! Parsers for the individual `.evt` statements.

use tracing::debug;

use crate::core::decls::{
    Event, Export, FileAnalyzer, Import, PacketAnalyzer, ProtocolAnalyzer, Transport,
};
use crate::core::diag::Location;
use crate::core::evt::ParseErrorKind;
use crate::core::evt::cursor::Cursor;

/// Host version from which packet analyzers may replace built-in ones.
pub const PACKET_REPLACES_VERSION: u32 = 50200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    ProtocolAnalyzer(ProtocolAnalyzer),
    FileAnalyzer(FileAnalyzer),
    PacketAnalyzer(PacketAnalyzer),
    Event(Event),
    Import(Import),
    Export(Export),
}

/// Parses one `;`-terminated statement located at `location`.
pub fn parse_statement(
    chunk: &str,
    location: &Location,
    host_version: u32,
) -> Result<Statement, ParseErrorKind> {
    let cursor = Cursor::new(chunk);

    if cursor.is_looking_at("protocol") {
        let analyzer = parse_protocol_analyzer(chunk, location)?;
        debug!("  Got protocol analyzer definition for {}", analyzer.name);
        Ok(Statement::ProtocolAnalyzer(analyzer))
    } else if cursor.is_looking_at("file") {
        let analyzer = parse_file_analyzer(chunk, location)?;
        debug!("  Got file analyzer definition for {}", analyzer.name);
        Ok(Statement::FileAnalyzer(analyzer))
    } else if cursor.is_looking_at("packet") {
        let analyzer = parse_packet_analyzer(chunk, location, host_version)?;
        debug!("  Got packet analyzer definition for {}", analyzer.name);
        Ok(Statement::PacketAnalyzer(analyzer))
    } else if cursor.is_looking_at("on") {
        let event = parse_event(chunk, location)?;
        debug!("  Got event definition for {}", event.name);
        Ok(Statement::Event(event))
    } else if cursor.is_looking_at("import") {
        Ok(Statement::Import(parse_import(chunk)?))
    } else if cursor.is_looking_at("export") {
        Ok(Statement::Export(parse_export(chunk, location)?))
    } else {
        Err(ParseErrorKind::UnknownStatement)
    }
}

/// Runs `clause` until the statement's `;`, requiring a `,` between clauses.
fn parse_clauses(
    cursor: &mut Cursor<'_>,
    mut clause: impl FnMut(&mut Cursor<'_>) -> Result<(), ParseErrorKind>,
) -> Result<(), ParseErrorKind> {
    loop {
        clause(cursor)?;
        if cursor.is_looking_at(";") {
            return Ok(());
        }
        cursor.eat_token(",")?;
    }
}

pub fn parse_protocol_analyzer(
    chunk: &str,
    location: &Location,
) -> Result<ProtocolAnalyzer, ParseErrorKind> {
    let mut cursor = Cursor::new(chunk);

    cursor.eat_token("protocol")?;
    cursor.eat_token("analyzer")?;
    let name = cursor.extract_id()?.to_string();

    cursor.eat_token("over")?;
    let proto = cursor.extract_id()?.as_str().to_lowercase();
    let transport =
        Transport::from_keyword(&proto).ok_or(ParseErrorKind::UnknownTransport(proto))?;

    cursor.eat_token(":")?;

    let mut analyzer = ProtocolAnalyzer {
        name,
        transport,
        orig_unit: None,
        resp_unit: None,
        ports: Vec::new(),
        replaces: None,
        location: location.clone(),
    };

    parse_clauses(&mut cursor, |cursor| {
        if cursor.eat_if("parse") {
            let (orig, resp) = if cursor.eat_if("originator") {
                (true, false)
            } else if cursor.eat_if("responder") {
                (false, true)
            } else if cursor.is_looking_at("with") {
                (true, true)
            } else {
                return Err(ParseErrorKind::InvalidParseSpec);
            };

            cursor.eat_token("with")?;
            let unit = cursor.extract_id()?;
            if orig {
                analyzer.orig_unit = Some(unit.clone());
            }
            if resp {
                analyzer.resp_unit = Some(unit);
            }
        } else if cursor.eat_if("ports") {
            cursor.eat_token("{")?;
            loop {
                analyzer.ports.extend(cursor.extract_ports()?);
                if cursor.eat_if("}") {
                    break;
                }
                cursor.eat_token(",")?;
            }
        } else if cursor.eat_if("port") {
            analyzer.ports.extend(cursor.extract_ports()?);
        } else if cursor.eat_if("replaces") {
            analyzer.replaces = Some(cursor.extract_id()?);
        } else {
            return Err(ParseErrorKind::UnexpectedToken);
        }
        Ok(())
    })?;

    if analyzer.orig_unit.is_none() && analyzer.resp_unit.is_none() {
        return Err(ParseErrorKind::MissingParseSpec(analyzer.name));
    }

    Ok(analyzer)
}

pub fn parse_file_analyzer(
    chunk: &str,
    location: &Location,
) -> Result<FileAnalyzer, ParseErrorKind> {
    let mut cursor = Cursor::new(chunk);

    cursor.eat_token("file")?;
    cursor.eat_token("analyzer")?;
    let name = cursor.extract_id()?.to_string();
    cursor.eat_token(":")?;

    let mut analyzer = FileAnalyzer {
        name,
        unit: None,
        mime_types: Vec::new(),
        replaces: None,
        location: location.clone(),
    };

    parse_clauses(&mut cursor, |cursor| {
        if cursor.eat_if("parse") {
            cursor.eat_token("with")?;
            analyzer.unit = Some(cursor.extract_id()?);
        } else if cursor.eat_if("mime-type") {
            analyzer.mime_types.push(cursor.extract_mime_type()?);
        } else if cursor.eat_if("replaces") {
            analyzer.replaces = Some(cursor.extract_id()?);
        } else {
            return Err(ParseErrorKind::UnexpectedToken);
        }
        Ok(())
    })?;

    Ok(analyzer)
}

pub fn parse_packet_analyzer(
    chunk: &str,
    location: &Location,
    host_version: u32,
) -> Result<PacketAnalyzer, ParseErrorKind> {
    let mut cursor = Cursor::new(chunk);

    cursor.eat_token("packet")?;
    cursor.eat_token("analyzer")?;
    let name = cursor.extract_id()?.to_string();
    cursor.eat_token(":")?;

    let mut analyzer = PacketAnalyzer {
        name,
        unit: None,
        replaces: None,
        location: location.clone(),
    };

    parse_clauses(&mut cursor, |cursor| {
        if cursor.eat_if("parse") {
            cursor.eat_token("with")?;
            analyzer.unit = Some(cursor.extract_id()?);
        } else if cursor.is_looking_at("replaces") {
            if host_version < PACKET_REPLACES_VERSION {
                return Err(ParseErrorKind::PacketReplacesUnsupported);
            }
            cursor.eat_token("replaces")?;
            analyzer.replaces = Some(cursor.extract_id()?);
        } else {
            return Err(ParseErrorKind::UnexpectedToken);
        }
        Ok(())
    })?;

    Ok(analyzer)
}

/// `on PATH [if (COND)] -> event NAME(ARGS) [&priority=N];`
pub fn parse_event(chunk: &str, location: &Location) -> Result<Event, ParseErrorKind> {
    let mut cursor = Cursor::new(chunk);

    cursor.eat_token("on")?;
    let path = cursor.extract_id()?;

    let mut condition = None;
    if cursor.eat_if("if") {
        cursor.eat_token("(")?;
        condition = Some(cursor.extract_expr()?);
        cursor.eat_token(")")?;
    }

    cursor.eat_token("->")?;
    cursor.eat_token("event")?;
    let name = cursor.extract_id()?;

    let mut event = Event::new(path, name, location.clone());
    event.condition = condition;

    cursor.eat_token("(")?;
    let mut first = true;
    while !cursor.eat_if(")") {
        if !first {
            cursor.eat_token(",")?;
        }
        event.exprs.push(cursor.extract_expr()?);
        first = false;
    }

    if cursor.eat_if("&priority") {
        cursor.eat_token("=")?;
        event.priority = cursor.extract_int()?;
    }

    cursor.eat_token(";")?;
    cursor.eat_spaces();
    if !cursor.rest().is_empty() {
        return Err(ParseErrorKind::TrailingCharacters);
    }

    Ok(event)
}

/// `import MODULE [from SCOPE];`
pub fn parse_import(chunk: &str) -> Result<Import, ParseErrorKind> {
    let mut cursor = Cursor::new(chunk);

    cursor.eat_token("import")?;
    let module = cursor.extract_id()?;

    let scope = if cursor.eat_if("from") {
        let scope = cursor.extract_path()?;
        debug!("  Got module {module} to import from scope {scope}");
        Some(scope)
    } else {
        debug!("  Got module {module} to import");
        None
    };

    Ok(Import { module, scope })
}

/// `export ID;`
pub fn parse_export(chunk: &str, location: &Location) -> Result<Export, ParseErrorKind> {
    let mut cursor = Cursor::new(chunk);

    cursor.eat_token("export")?;
    let id = cursor.extract_id()?;
    cursor.eat_token(";")?;

    Ok(Export {
        id,
        location: location.clone(),
    })
}

#[cfg(test)]
#[path = "../../tests/evt/t_parse.rs"]
mod tests;
