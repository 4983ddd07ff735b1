mod snippet;

pub(crate) use crate::persistence::snippet::{
    SnippetActiveModel, SnippetColumn, SnippetEntity, SnippetModel, SnippetPayload,
};
