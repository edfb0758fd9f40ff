pub mod resume;
pub mod section;

pub use resume::{
    Certification, ContactInfo, Education, Experience, ExtraCourse, Feedback,
    GenerationResponse, Project, ResumeDocument,
};
pub use section::{SectionContent, SectionKey};
