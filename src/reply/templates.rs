//! Reply prompts and canned fallback replies, one pair per category.

use crate::classifier::Category;

/// System role for reply generation.
pub const REPLY_SYSTEM_PROMPT: &str = "Você é um assistente profissional de uma empresa do \
setor financeiro e redige respostas automáticas para emails de clientes.";

/// Canned reply for emails that need action.
pub const PRODUCTIVE_FALLBACK_REPLY: &str = "Prezado(a),

Agradecemos seu contato. Nossa equipe analisará sua solicitação e retornará em breve.

Atenciosamente,
Equipe de Atendimento";

/// Canned reply for emails that need no action.
pub const UNPRODUCTIVE_FALLBACK_REPLY: &str = "Prezado(a),

Agradecemos sua mensagem.

Atenciosamente,
Equipe de Atendimento";

const PRODUCTIVE_TEMPLATE: &str = "\
Um cliente enviou o email abaixo, classificado como **Produtivo** (requer ação ou resposta):

\"{email_text}\"

Escreva uma resposta profissional e cordial. A resposta deve:
- manter tom corporativo e respeitoso
- tratar as questões levantadas
- ser concisa, mas completa
- se for uma solicitação, informar que a equipe já está cuidando do assunto
- se for uma dúvida, trazer informações úteis ou avisar que será respondida em breve

Devolva APENAS o texto da resposta, sem comentários adicionais.";

const UNPRODUCTIVE_TEMPLATE: &str = "\
Um cliente enviou o email abaixo, classificado como **Improdutivo** (não requer ação imediata):

\"{email_text}\"

Escreva uma resposta breve, profissional e cordial. A resposta deve:
- manter tom corporativo e respeitoso
- agradecer ou reconhecer a mensagem
- ser curta, já que nenhuma ação é necessária

Devolva APENAS o texto da resposta, sem comentários adicionais.";

/// Canned reply for a category.
pub fn fallback_reply(category: Category) -> &'static str {
    match category {
        Category::Productive => PRODUCTIVE_FALLBACK_REPLY,
        Category::Unproductive => UNPRODUCTIVE_FALLBACK_REPLY,
    }
}

/// User prompt for a category with the email text interpolated.
pub fn reply_user_prompt(email_text: &str, category: Category) -> String {
    let template = match category {
        Category::Productive => PRODUCTIVE_TEMPLATE,
        Category::Unproductive => UNPRODUCTIVE_TEMPLATE,
    };
    template.replace("{email_text}", email_text)
}
