mod entity;
mod payload;

pub(crate) use entity::{
    ActiveModel as SnippetActiveModel, Column as SnippetColumn, Entity as SnippetEntity,
    Model as SnippetModel,
};
pub(crate) use payload::SnippetPayload;
