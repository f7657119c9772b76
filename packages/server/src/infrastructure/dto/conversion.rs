//! Conversion logic between DTOs and domain models.

use hiroba_shared::time::timestamp_to_rfc3339;

use crate::domain::{ClientRecord, Group, InboundRequest, OutboundMessage};
use crate::infrastructure::dto::{
    http::{GroupSummaryDto, UserSummaryDto},
    websocket::{InboundRequestDto, OutboundMessageDto},
};

// ========================================
// DTO → Domain
// ========================================

impl From<InboundRequestDto> for InboundRequest {
    fn from(dto: InboundRequestDto) -> Self {
        Self {
            kind: dto.r#type,
            target: dto.target,
            content: dto.content,
        }
    }
}

// ========================================
// Domain → DTO
// ========================================

impl From<OutboundMessage> for OutboundMessageDto {
    fn from(model: OutboundMessage) -> Self {
        let (sender_id, sender_name) = match model.sender {
            Some(identity) => (
                Some(identity.id.into_string()),
                Some(identity.name.into_string()),
            ),
            None => (None, None),
        };
        Self {
            r#type: model.kind.as_str().to_string(),
            sender_id,
            sender_name,
            content: model.content,
            target: model.target,
            timestamp: timestamp_to_rfc3339(model.timestamp.value()),
        }
    }
}

impl From<&Group> for GroupSummaryDto {
    fn from(group: &Group) -> Self {
        Self {
            id: group.id.as_str().to_string(),
            members: group
                .members
                .iter()
                .map(|id| id.as_str().to_string())
                .collect(),
        }
    }
}

impl From<&ClientRecord> for UserSummaryDto {
    fn from(record: &ClientRecord) -> Self {
        Self {
            id: record.identity.id.as_str().to_string(),
            name: record.identity.name.as_str().to_string(),
            connected_at: timestamp_to_rfc3339(record.connected_at.value()),
            groups: record
                .groups
                .iter()
                .map(|group| group.as_str().to_string())
                .collect(),
        }
    }
}
