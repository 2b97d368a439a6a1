pub mod purchase_form;
