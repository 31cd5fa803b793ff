mod ormas;

pub use ormas::{
    Attachment, AttachmentFile, AttachmentSlot, Attachments, DocumentRow, Ormas, OrmasRow,
    OrmasStatus,
};
